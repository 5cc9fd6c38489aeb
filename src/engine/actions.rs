//! Action derivation: which chain calls the current snapshot permits.
//!
//! Actions are emitted in a fixed order: purchase (Active), yield (Running),
//! bonus (Running/Completed), fare (Completed). Callers must not reorder.

use super::grace::{GracePeriodCalculator, GraceResult};
use super::lifecycle::Phase;
use super::metrics::{cabin_accrued_yield, cabin_matured};
use super::target::TargetAvailability;
use crate::domain::{
    BlockNumber, DpoIndex, DpoRecord, Target, TargetSnapshot, TravelCabinBuyerRecord,
    TravelCabinIndex, TravelCabinRecord,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    BuyTravelCabin,
    /// Form-driven: the user picks the replacement.
    SelectReplacementTarget,
    BuyDpoSeats,
    WithdrawYieldFromCabin,
    ReleaseYieldToMembers,
    ReleaseBonusToMembers,
    WithdrawFareFromCabin,
    ReleaseFareToMembers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    /// Can be submitted now.
    Ready,
    /// Nothing left to move.
    Exhausted,
    /// Not possible yet (e.g., cabin not matured).
    Locked,
    /// Depends on a target snapshot that has not loaded.
    Pending,
}

/// Who may submit the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Caller {
    Manager,
    Anyone,
}

/// Positional argument of a chain call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CallArg {
    Dpo(DpoIndex),
    TravelCabin(TravelCabinIndex),
    InventorySlot(u16),
    Seats(u8),
}

/// Argument the user must still supply through a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormInput {
    NewTarget,
}

/// Chain call that would satisfy an action. Building and signing it is the submitter's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallDescriptor {
    pub method: String,
    pub args: Vec<CallArg>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<FormInput>,
}

impl CallDescriptor {
    fn new(method: &str, args: Vec<CallArg>) -> Self {
        Self {
            method: method.to_string(),
            args,
            inputs: Vec::new(),
        }
    }

    fn with_input(mut self, input: FormInput) -> Self {
        self.inputs.push(input);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub kind: ActionKind,
    pub enabled: bool,
    pub status: ActionStatus,
    pub caller: Caller,
    pub grace_period: Option<GraceResult>,
    pub required_params: CallDescriptor,
}

impl Action {
    fn new(
        kind: ActionKind,
        status: ActionStatus,
        caller: Caller,
        grace_period: Option<GraceResult>,
        required_params: CallDescriptor,
    ) -> Self {
        Self {
            kind,
            enabled: status == ActionStatus::Ready,
            status,
            caller,
            grace_period,
            required_params,
        }
    }
}

/// Inputs for one derivation pass.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    pub dpo: &'a DpoRecord,
    pub target: Option<&'a TargetSnapshot>,
    pub availability: TargetAvailability,
    pub phase: Phase,
    pub current_block: BlockNumber,
}

impl<'a> ActionContext<'a> {
    fn cabin(&self) -> Option<(&'a TravelCabinRecord, Option<&'a TravelCabinBuyerRecord>)> {
        match self.target {
            Some(TargetSnapshot::TravelCabin { cabin, buyer, .. }) => Some((cabin, buyer.as_ref())),
            _ => None,
        }
    }
}

/// Derives the ordered action list for a validated snapshot.
pub struct ActionDeriver<'a> {
    ctx: ActionContext<'a>,
    grace: &'a GracePeriodCalculator,
}

impl<'a> ActionDeriver<'a> {
    pub fn new(ctx: ActionContext<'a>, grace: &'a GracePeriodCalculator) -> Self {
        Self { ctx, grace }
    }

    pub fn derive(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        match self.ctx.phase {
            Phase::Active => actions.push(self.purchase_action()),
            Phase::Running => {
                actions.push(self.yield_action());
                actions.extend(self.bonus_action());
            }
            Phase::Completed => {
                actions.extend(self.bonus_action());
                actions.push(self.fare_action());
            }
            Phase::Created | Phase::Expired | Phase::Failed | Phase::Indeterminate => {}
        }
        actions
    }

    /// Active: buy the declared target, or pick a new one if it is gone.
    fn purchase_action(&self) -> Action {
        let dpo = self.ctx.dpo;
        let grace = self.grace.commitment(dpo, self.ctx.current_block);

        if self.ctx.availability == TargetAvailability::Unavailable {
            return Action::new(
                ActionKind::SelectReplacementTarget,
                ActionStatus::Ready,
                Caller::Manager,
                grace,
                CallDescriptor::new("dpo_change_target", vec![CallArg::Dpo(dpo.index)])
                    .with_input(FormInput::NewTarget),
            );
        }

        let status = match self.ctx.availability {
            TargetAvailability::Available => ActionStatus::Ready,
            _ => ActionStatus::Pending,
        };
        match dpo.target {
            Target::TravelCabin(cabin_index) => Action::new(
                ActionKind::BuyTravelCabin,
                status,
                Caller::Manager,
                grace,
                CallDescriptor::new(
                    "dpo_buy_travel_cabin",
                    vec![CallArg::Dpo(dpo.index), CallArg::TravelCabin(cabin_index)],
                ),
            ),
            Target::Dpo(target_index, seats) => Action::new(
                ActionKind::BuyDpoSeats,
                status,
                Caller::Manager,
                grace,
                CallDescriptor::new(
                    "dpo_buy_dpo_seats",
                    vec![
                        CallArg::Dpo(dpo.index),
                        CallArg::Dpo(target_index),
                        CallArg::Seats(seats),
                    ],
                ),
            ),
        }
    }

    /// Running: pull yield out of the cabin, or pass DPO yield on to members.
    fn yield_action(&self) -> Action {
        let dpo = self.ctx.dpo;
        match dpo.target {
            Target::TravelCabin(cabin_index) => {
                let Some((cabin, Some(buyer))) = self.ctx.cabin() else {
                    return Action::new(
                        ActionKind::WithdrawYieldFromCabin,
                        ActionStatus::Pending,
                        Caller::Manager,
                        None,
                        CallDescriptor::new(
                            "withdraw_yield_from_travel_cabin",
                            vec![CallArg::TravelCabin(cabin_index)],
                        ),
                    );
                };
                let grace = self.grace.cabin_withdrawal(buyer, self.ctx.current_block);
                let status = if cabin_accrued_yield(cabin, buyer, self.ctx.current_block).is_zero()
                {
                    ActionStatus::Exhausted
                } else {
                    ActionStatus::Ready
                };
                // Past the window anyone may withdraw what is left (and is rewarded on chain).
                let caller = if grace.is_overdue() && status == ActionStatus::Ready {
                    Caller::Anyone
                } else {
                    Caller::Manager
                };
                Action::new(
                    ActionKind::WithdrawYieldFromCabin,
                    status,
                    caller,
                    Some(grace),
                    CallDescriptor::new(
                        "withdraw_yield_from_travel_cabin",
                        vec![
                            CallArg::TravelCabin(cabin_index),
                            CallArg::InventorySlot(buyer.inventory_index),
                        ],
                    ),
                )
            }
            Target::Dpo(..) => {
                let status = if dpo.vault_yield.is_zero() {
                    ActionStatus::Exhausted
                } else {
                    ActionStatus::Ready
                };
                Action::new(
                    ActionKind::ReleaseYieldToMembers,
                    status,
                    Caller::Manager,
                    self.grace.yield_release(dpo, self.ctx.current_block),
                    CallDescriptor::new("release_yield_from_dpo", vec![CallArg::Dpo(dpo.index)]),
                )
            }
        }
    }

    /// Running/Completed: only once a bonus has been received.
    fn bonus_action(&self) -> Option<Action> {
        let dpo = self.ctx.dpo;
        let status = if !dpo.vault_bonus.is_zero() {
            ActionStatus::Ready
        } else if dpo.bonus_exhausted() {
            ActionStatus::Exhausted
        } else {
            return None;
        };
        Some(Action::new(
            ActionKind::ReleaseBonusToMembers,
            status,
            Caller::Manager,
            None,
            CallDescriptor::new("release_bonus_from_dpo", vec![CallArg::Dpo(dpo.index)]),
        ))
    }

    /// Completed: recover the cabin fare, or pass the returned deposit on to members.
    fn fare_action(&self) -> Action {
        let dpo = self.ctx.dpo;
        match dpo.target {
            Target::TravelCabin(cabin_index) => {
                let Some((cabin, Some(buyer))) = self.ctx.cabin() else {
                    return Action::new(
                        ActionKind::WithdrawFareFromCabin,
                        ActionStatus::Pending,
                        Caller::Manager,
                        None,
                        CallDescriptor::new(
                            "withdraw_fare_from_travel_cabin",
                            vec![CallArg::TravelCabin(cabin_index)],
                        ),
                    );
                };
                let status = if buyer.fare_withdrawn {
                    ActionStatus::Exhausted
                } else if !cabin_matured(cabin, buyer, self.ctx.current_block) {
                    ActionStatus::Locked
                } else {
                    ActionStatus::Ready
                };
                Action::new(
                    ActionKind::WithdrawFareFromCabin,
                    status,
                    Caller::Manager,
                    None,
                    CallDescriptor::new(
                        "withdraw_fare_from_travel_cabin",
                        vec![
                            CallArg::TravelCabin(cabin_index),
                            CallArg::InventorySlot(buyer.inventory_index),
                        ],
                    ),
                )
            }
            Target::Dpo(..) => {
                let status = if dpo.vault_withdraw.is_zero() {
                    ActionStatus::Exhausted
                } else {
                    ActionStatus::Ready
                };
                Action::new(
                    ActionKind::ReleaseFareToMembers,
                    status,
                    Caller::Manager,
                    None,
                    CallDescriptor::new("release_fare_from_dpo", vec![CallArg::Dpo(dpo.index)]),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::domain::{AccountId, Balance, DpoState, TokenSymbol};

    fn running_dpo_target() -> DpoRecord {
        DpoRecord {
            index: 1,
            state: DpoState::Running,
            target: Target::Dpo(3, 20),
            token: TokenSymbol::new("BOLT".to_string()),
            manager: AccountId::new("5Manager".to_string()),
            amount_per_seat: Balance::new(100),
            target_amount: Balance::new(10_000),
            target_maturity: 1000,
            target_bonus_estimate: Balance::ZERO,
            target_yield_estimate: Balance::new(1000),
            total_yield_received: Balance::new(500),
            total_bonus_received: Balance::ZERO,
            empty_seats: 0,
            fee_bps: 50,
            direct_referral_rate_bps: 10,
            expiry_blk: BlockNumber::new(100),
            vault_deposit: Balance::ZERO,
            vault_bonus: Balance::ZERO,
            vault_yield: Balance::new(500),
            vault_withdraw: Balance::ZERO,
            blk_of_dpo_filled: Some(BlockNumber::new(50)),
            blk_of_last_yield: None,
        }
    }

    fn derive(dpo: &DpoRecord, phase: Phase) -> Vec<Action> {
        let grace = GracePeriodCalculator::new(&EngineConfig::default());
        let ctx = ActionContext {
            dpo,
            target: None,
            availability: TargetAvailability::Unknown,
            phase,
            current_block: BlockNumber::new(1_000),
        };
        ActionDeriver::new(ctx, &grace).derive()
    }

    #[test]
    fn test_release_yield_uses_activation_when_never_released() {
        let dpo = running_dpo_target();
        let actions = derive(&dpo, Phase::Running);
        assert_eq!(actions.len(), 1);
        let grace = actions[0].grace_period.as_ref().unwrap();
        assert_eq!(grace.reference_block, BlockNumber::new(50));
        assert_eq!(actions[0].required_params.method, "release_yield_from_dpo");
    }

    #[test]
    fn test_bonus_omitted_when_never_received() {
        let dpo = running_dpo_target();
        let kinds: Vec<_> = derive(&dpo, Phase::Running).iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![ActionKind::ReleaseYieldToMembers]);
    }

    #[test]
    fn test_completed_orders_bonus_before_fare() {
        let mut dpo = running_dpo_target();
        dpo.state = DpoState::Completed;
        dpo.total_bonus_received = Balance::new(40);
        dpo.vault_bonus = Balance::new(40);
        dpo.vault_withdraw = Balance::new(10_000);
        let kinds: Vec<_> = derive(&dpo, Phase::Completed).iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ActionKind::ReleaseBonusToMembers,
                ActionKind::ReleaseFareToMembers
            ]
        );
    }

    #[test]
    fn test_no_actions_outside_manager_phases() {
        let dpo = running_dpo_target();
        for phase in [Phase::Created, Phase::Expired, Phase::Failed, Phase::Indeterminate] {
            assert!(derive(&dpo, phase).is_empty());
        }
    }

    #[test]
    fn test_call_arg_serialization() {
        let json = serde_json::to_string(&CallArg::Seats(20)).unwrap();
        assert_eq!(json, r#"{"type":"seats","value":20}"#);
    }
}

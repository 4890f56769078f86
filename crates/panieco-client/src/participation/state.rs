use panieco_core::{progress_percent, status_config, GroupOrderStatus, StatusConfig};
use rust_decimal::Decimal;

use crate::types::ParticipantInfo;

/// One shopper's relationship to one group order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipationState {
    NotParticipating,
    /// Joined, not paid. The id is `None` only between an optimistic join
    /// and the refresh that follows it.
    ParticipantUnpaid { participant_id: Option<i64> },
    /// Only ever reached from a backend read.
    ParticipantPaid { participant_id: i64 },
}

impl ParticipationState {
    /// Projects the backend's participant-info read onto a state.
    #[must_use]
    pub fn from_info(info: &ParticipantInfo) -> Self {
        match info.participant_id {
            None => ParticipationState::NotParticipating,
            Some(participant_id) if info.has_paid() => {
                ParticipationState::ParticipantPaid { participant_id }
            }
            Some(participant_id) => ParticipationState::ParticipantUnpaid {
                participant_id: Some(participant_id),
            },
        }
    }

    #[must_use]
    pub fn participant_id(self) -> Option<i64> {
        match self {
            ParticipationState::NotParticipating => None,
            ParticipationState::ParticipantUnpaid { participant_id } => participant_id,
            ParticipationState::ParticipantPaid { participant_id } => Some(participant_id),
        }
    }

    #[must_use]
    pub fn is_participating(self) -> bool {
        !matches!(self, ParticipationState::NotParticipating)
    }

    #[must_use]
    pub fn has_paid(self) -> bool {
        matches!(self, ParticipationState::ParticipantPaid { .. })
    }
}

/// Last confirmed view of a group order from this shopper's side.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupOrderSnapshot {
    pub public_id: String,
    pub total_amount: Decimal,
    pub free_shipping_min: Decimal,
    pub status: Option<GroupOrderStatus>,
    pub participation: ParticipationState,
}

impl GroupOrderSnapshot {
    #[must_use]
    pub fn progress_percent(&self) -> Decimal {
        progress_percent(self.total_amount, self.free_shipping_min)
    }

    /// Badge for the order, when the backend reported a status.
    #[must_use]
    pub fn status_config(&self) -> Option<StatusConfig> {
        self.status
            .as_ref()
            .map(|s| status_config(s, self.total_amount, self.free_shipping_min))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(participant_id: Option<i64>, paid_at: Option<&str>) -> ParticipantInfo {
        ParticipantInfo {
            participant_id,
            paid_at: paid_at.map(|s| serde_json::Value::String(s.to_owned())),
        }
    }

    #[test]
    fn no_participant_id_means_not_participating() {
        assert_eq!(
            ParticipationState::from_info(&info(None, Some("2025-01-01"))),
            ParticipationState::NotParticipating
        );
    }

    #[test]
    fn paid_at_decides_paid_state() {
        assert_eq!(
            ParticipationState::from_info(&info(Some(4), None)),
            ParticipationState::ParticipantUnpaid {
                participant_id: Some(4)
            }
        );
        let paid = ParticipationState::from_info(&info(Some(4), Some("2025-01-01T09:00:00Z")));
        assert_eq!(
            paid,
            ParticipationState::ParticipantPaid { participant_id: 4 }
        );
        assert!(paid.has_paid());
        assert_eq!(paid.participant_id(), Some(4));
    }

    #[test]
    fn snapshot_derives_progress_and_badge() {
        let snapshot = GroupOrderSnapshot {
            public_id: "PAN-1".to_owned(),
            total_amount: Decimal::from(40),
            free_shipping_min: Decimal::from(50),
            status: Some(GroupOrderStatus::Pending),
            participation: ParticipationState::NotParticipating,
        };
        assert_eq!(snapshot.progress_percent(), Decimal::from(80));
        let badge = snapshot.status_config().unwrap();
        assert!(badge.label.contains("10.00"));
    }
}

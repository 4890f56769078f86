use panieco_core::CartError;
use thiserror::Error;

use crate::error::ClientError;

/// Broad failure class shown to the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally before any request was sent.
    Validation,
    /// The request never got an HTTP response.
    Network,
    /// HTTP 409: the participant already paid.
    Conflict,
    /// The backend answered with an error or an unusable body.
    Upstream,
}

/// Errors surfaced by [`ParticipationController`](super::ParticipationController)
/// and [`create_group_order`](super::create_group_order).
///
/// None of these is fatal. Each leaves the controller in its last confirmed
/// state and maps to a message suitable for inline display.
#[derive(Debug, Error)]
pub enum ParticipationError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("invalid cart: {0}")]
    InvalidCart(CartError),

    /// No successful refresh yet, so the participation state is unknown.
    #[error("participation state has not been loaded")]
    NotLoaded,

    #[error("client already participates in this group order")]
    AlreadyParticipating,

    #[error("client does not participate in this group order")]
    NotParticipating,

    /// Participating, but the backend has not reported the participant id yet.
    #[error("participant id is unknown")]
    UnknownParticipant,

    /// Another mutation holds the processing flag; this call was dropped.
    #[error("another action is already in progress")]
    InProgress,

    #[error("controller has been disposed")]
    Disposed,

    #[error("failed to join group order: {0}")]
    JoinFailed(#[source] ClientError),

    #[error("failed to leave group order: {0}")]
    LeaveFailed(#[source] ClientError),

    #[error("participant has already paid: {0}")]
    AlreadyPaid(#[source] ClientError),

    #[error("failed to start payment: {0}")]
    PaymentInitFailed(#[source] ClientError),

    #[error("failed to refresh group order: {0}")]
    RefreshFailed(#[source] ClientError),

    #[error("failed to create group order: {0}")]
    CreateFailed(#[source] ClientError),
}

impl From<CartError> for ParticipationError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::Empty => ParticipationError::EmptyCart,
            other => ParticipationError::InvalidCart(other),
        }
    }
}

impl ParticipationError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParticipationError::EmptyCart
            | ParticipationError::InvalidCart(_)
            | ParticipationError::NotLoaded
            | ParticipationError::AlreadyParticipating
            | ParticipationError::NotParticipating
            | ParticipationError::UnknownParticipant
            | ParticipationError::InProgress
            | ParticipationError::Disposed => ErrorKind::Validation,
            ParticipationError::AlreadyPaid(_) => ErrorKind::Conflict,
            ParticipationError::JoinFailed(e)
            | ParticipationError::LeaveFailed(e)
            | ParticipationError::PaymentInitFailed(e)
            | ParticipationError::RefreshFailed(e)
            | ParticipationError::CreateFailed(e) => match e {
                ClientError::Conflict { .. } => ErrorKind::Conflict,
                ClientError::Http(_) if e.is_network() => ErrorKind::Network,
                _ => ErrorKind::Upstream,
            },
        }
    }

    /// French message for inline display in the widget.
    #[must_use]
    pub fn user_message(&self) -> String {
        let text = match self {
            ParticipationError::EmptyCart => "Votre panier est vide.",
            ParticipationError::InvalidCart(CartError::AmountOverflow) => {
                "Le montant de votre panier est trop élevé."
            }
            ParticipationError::InvalidCart(_) => "Votre panier contient un article invalide.",
            ParticipationError::NotLoaded => "Le Panieco n'est pas encore chargé.",
            ParticipationError::AlreadyParticipating => "Vous participez déjà à ce Panieco.",
            ParticipationError::NotParticipating | ParticipationError::UnknownParticipant => {
                "Vous ne participez pas à ce Panieco."
            }
            ParticipationError::InProgress => "Une action est déjà en cours.",
            ParticipationError::Disposed => "Action annulée.",
            ParticipationError::JoinFailed(_) => "Impossible de rejoindre le Panieco.",
            ParticipationError::LeaveFailed(_) => "Impossible de quitter le Panieco.",
            ParticipationError::AlreadyPaid(_) => {
                "Vous avez déjà payé votre part sur ce Panieco."
            }
            ParticipationError::PaymentInitFailed(e) => {
                return e
                    .upstream_message()
                    .unwrap_or("Impossible de démarrer le paiement.")
                    .to_owned();
            }
            ParticipationError::RefreshFailed(_) => "Erreur de chargement du Panieco.",
            ParticipationError::CreateFailed(e) => {
                return e
                    .upstream_message()
                    .unwrap_or("Erreur lors de la création du Panieco.")
                    .to_owned();
            }
        };
        text.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(status: u16, message: Option<&str>) -> ClientError {
        ClientError::Upstream {
            status,
            url: "http://localhost/api".to_owned(),
            message: message.map(str::to_owned),
        }
    }

    #[test]
    fn empty_cart_is_a_validation_error() {
        let err = ParticipationError::from(CartError::Empty);
        assert!(matches!(err, ParticipationError::EmptyCart));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.user_message(), "Votre panier est vide.");
    }

    #[test]
    fn other_cart_errors_stay_distinct() {
        let err = ParticipationError::from(CartError::ZeroQuantity { id: "x".to_owned() });
        assert!(matches!(err, ParticipationError::InvalidCart(_)));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn cart_overflow_is_a_validation_error() {
        let err = ParticipationError::from(CartError::AmountOverflow);
        assert!(matches!(
            err,
            ParticipationError::InvalidCart(CartError::AmountOverflow)
        ));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            err.user_message(),
            "Le montant de votre panier est trop élevé."
        );
    }

    #[test]
    fn already_paid_is_a_conflict() {
        let err = ParticipationError::AlreadyPaid(ClientError::Conflict {
            url: "http://shop/panieco/checkout-session".to_owned(),
            message: None,
        });
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(
            err.user_message(),
            "Vous avez déjà payé votre part sur ce Panieco."
        );
    }

    #[test]
    fn payment_failure_prefers_backend_message() {
        let with_text =
            ParticipationError::PaymentInitFailed(upstream(400, Some("Stock insuffisant")));
        assert_eq!(with_text.user_message(), "Stock insuffisant");
        assert_eq!(with_text.kind(), ErrorKind::Upstream);

        let without = ParticipationError::PaymentInitFailed(upstream(500, None));
        assert_eq!(without.user_message(), "Impossible de démarrer le paiement.");
    }

    #[test]
    fn join_failure_uses_fixed_message() {
        let err = ParticipationError::JoinFailed(upstream(500, Some("boom")));
        assert_eq!(err.user_message(), "Impossible de rejoindre le Panieco.");
        assert_eq!(err.kind(), ErrorKind::Upstream);
    }
}

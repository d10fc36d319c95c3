//! Hold and Order lifecycle state machines.
//!
//! This module lives in `core` (zero internal deps) so it can be used by
//! both the API/repository layer and any future tooling. Status IDs are
//! intentionally duplicated from the `db` crate's status enums because
//! `core` must have zero internal deps.
//!
//! Engines consult these tables before every status write; the storage
//! layer never second-guesses a transition.

/// Hold status IDs matching `hold_statuses` seed data (1-based SMALLSERIAL).
///
/// Permitted paths:
/// `active -> used -> cancelled`, `active -> expired`, `active -> cancelled`.
pub mod hold_machine {
    /// Returns the set of valid target status IDs reachable from `from_status`.
    ///
    /// Terminal states (Expired=3, Cancelled=4) return an empty slice.
    pub fn valid_transitions(from_status: i16) -> &'static [i16] {
        match from_status {
            // Active -> Used, Expired, Cancelled
            1 => &[2, 3, 4],
            // Used -> Cancelled (payment failure releases the reservation)
            2 => &[4],
            // Terminal states: Expired, Cancelled
            3 | 4 => &[],
            // Unknown status: no transitions allowed
            _ => &[],
        }
    }

    /// Check whether a transition from `from` to `to` is valid.
    pub fn can_transition(from: i16, to: i16) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Validate a state transition, returning an error message for invalid ones.
    pub fn validate_transition(from: i16, to: i16) -> Result<(), String> {
        if can_transition(from, to) {
            Ok(())
        } else {
            Err(format!(
                "invalid hold transition: {} ({from}) -> {} ({to})",
                status_name(from),
                status_name(to),
            ))
        }
    }

    /// Human-readable name for a status ID (for error messages).
    pub fn status_name(id: i16) -> &'static str {
        match id {
            1 => "active",
            2 => "used",
            3 => "expired",
            4 => "cancelled",
            _ => "unknown",
        }
    }
}

/// Order status IDs matching `order_statuses` seed data (1-based SMALLSERIAL).
///
/// Orders are created `pending` and settle exactly once: `pending -> paid`
/// or `pending -> cancelled`. Terminal states are absorbing.
pub mod order_machine {
    /// Returns the set of valid target status IDs reachable from `from_status`.
    pub fn valid_transitions(from_status: i16) -> &'static [i16] {
        match from_status {
            // Pending -> Paid, Cancelled
            1 => &[2, 3],
            // Terminal states: Paid, Cancelled
            2 | 3 => &[],
            _ => &[],
        }
    }

    /// Check whether a transition from `from` to `to` is valid.
    pub fn can_transition(from: i16, to: i16) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Validate a state transition, returning an error message for invalid ones.
    pub fn validate_transition(from: i16, to: i16) -> Result<(), String> {
        if can_transition(from, to) {
            Ok(())
        } else {
            Err(format!(
                "invalid order transition: {} ({from}) -> {} ({to})",
                status_name(from),
                status_name(to),
            ))
        }
    }

    /// Human-readable name for a status ID (for error messages).
    pub fn status_name(id: i16) -> &'static str {
        match id {
            1 => "pending",
            2 => "paid",
            3 => "cancelled",
            _ => "unknown",
        }
    }

    /// Whether an order in `status` absorbs further payment outcomes.
    pub fn is_terminal(status: i16) -> bool {
        valid_transitions(status).is_empty() && status_name(status) != "unknown"
    }
}

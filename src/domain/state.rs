use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle of a leave request, persisted as snake_case strings.
///
/// `ValidateOne` and `ValidateTwo` are the two nominal approval stages;
/// `ValidateTwo` is the effective "approved" state. `Refused` is absorbing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum State {
    #[default]
    ToSubmit,
    ValidateOne,
    ValidateTwo,
    Refused,
}

impl State {
    /// Human label for table badges.
    pub fn label(&self) -> &'static str {
        match self {
            State::ToSubmit => "To Submit",
            State::ValidateOne => "Second Approval",
            State::ValidateTwo => "Approved",
            State::Refused => "Refused",
        }
    }
}

/// Half of the working day a half-day request covers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Period {
    Morning,
    Afternoon,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_state_round_trips_through_db_string() {
        for state in State::iter() {
            let stored = state.to_string();
            assert_eq!(State::from_str(&stored).unwrap(), state);
        }
    }

    #[test]
    fn test_state_db_strings_are_snake_case() {
        assert_eq!(State::ToSubmit.to_string(), "to_submit");
        assert_eq!(State::ValidateOne.to_string(), "validate_one");
        assert_eq!(State::ValidateTwo.to_string(), "validate_two");
        assert_eq!(State::Refused.to_string(), "refused");
    }

    #[test]
    fn test_period_round_trips() {
        assert_eq!(Period::from_str("morning").unwrap(), Period::Morning);
        assert_eq!(Period::Afternoon.to_string(), "afternoon");
    }

    #[test]
    fn test_new_requests_start_in_to_submit() {
        assert_eq!(State::default(), State::ToSubmit);
    }
}

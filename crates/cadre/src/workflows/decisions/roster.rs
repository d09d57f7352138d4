use std::collections::HashSet;

use super::domain::{CommitteeMember, MemberSlot};
use crate::validation::{validate_national_id, validate_phone_number};

/// First rule a committee roster breaks, checked in a fixed order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterViolation {
    #[error("every committee member must have a different national id")]
    DuplicateNationalId { national_id: String },
    #[error("national id for {slot:?} must be 14 digits in the standard format")]
    InvalidNationalId { slot: MemberSlot, national_id: String },
    #[error("phone for {slot:?} must be 11 digits starting with 010, 011, 012 or 015")]
    InvalidPhone { slot: MemberSlot, phone: String },
}

/// Check uniqueness of national ids across the whole roster, then each id, then each phone.
pub fn validate_roster(members: &[CommitteeMember]) -> Result<(), RosterViolation> {
    let mut seen = HashSet::with_capacity(members.len());
    for member in members {
        if !seen.insert(member.national_id.as_str()) {
            return Err(RosterViolation::DuplicateNationalId {
                national_id: member.national_id.clone(),
            });
        }
    }

    if let Some(member) = members
        .iter()
        .find(|member| !validate_national_id(&member.national_id))
    {
        return Err(RosterViolation::InvalidNationalId {
            slot: member.slot,
            national_id: member.national_id.clone(),
        });
    }

    if let Some(member) = members
        .iter()
        .find(|member| !validate_phone_number(&member.phone))
    {
        return Err(RosterViolation::InvalidPhone {
            slot: member.slot,
            phone: member.phone.clone(),
        });
    }

    Ok(())
}

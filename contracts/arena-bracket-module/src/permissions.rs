use cosmwasm_std::{Addr, StdResult, Storage};

/// Decides who may report or undo stage results for a match.
pub trait ScorePermission {
    fn can_report_score(&self, user: &Addr, members: &[Addr]) -> bool;
}

/// The bracket organizer (contract owner) or anyone on a seated team.
pub struct OrganizerOrTeamMember {
    organizer: Option<Addr>,
}

impl OrganizerOrTeamMember {
    pub fn new(organizer: Option<Addr>) -> Self {
        Self { organizer }
    }

    pub fn load(storage: &dyn Storage) -> StdResult<Self> {
        Ok(Self::new(cw_ownable::get_ownership(storage)?.owner))
    }
}

impl ScorePermission for OrganizerOrTeamMember {
    fn can_report_score(&self, user: &Addr, members: &[Addr]) -> bool {
        self.organizer.as_ref() == Some(user) || members.contains(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organizer_and_members_may_report() {
        let organizer = Addr::unchecked("organizer");
        let member = Addr::unchecked("member");
        let stranger = Addr::unchecked("stranger");
        let permission = OrganizerOrTeamMember::new(Some(organizer.clone()));

        assert!(permission.can_report_score(&organizer, &[]));
        assert!(permission.can_report_score(&member, &[member.clone()]));
        assert!(!permission.can_report_score(&stranger, &[member]));
    }

    #[test]
    fn renounced_ownership_leaves_members_only() {
        let member = Addr::unchecked("member");
        let permission = OrganizerOrTeamMember::new(None);

        assert!(permission.can_report_score(&member, &[member.clone()]));
        assert!(!permission.can_report_score(&Addr::unchecked("organizer"), &[member]));
    }
}

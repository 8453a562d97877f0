use itertools::Itertools;

use crate::model::{AdminSquad, Role, Squad, SquadMember};

/// The identity behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub role: Role,
}

impl Caller {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn can_export_reports(&self) -> bool {
        self.role.is_admin()
    }

    /// Super admins see every squad, admins the squads assigned to them.
    pub fn visible_squads<'a>(&self, squads: &'a [Squad], admin_squads: &[AdminSquad]) -> Vec<&'a Squad> {
        match self.role {
            Role::SuperAdmin => squads.iter().collect_vec(),
            Role::Admin => squads
                .iter()
                .filter(|squad| {
                    admin_squads
                        .iter()
                        .any(|link| link.admin_id == self.user_id && link.squad_id == squad.id)
                })
                .collect_vec(),
            Role::User => vec![],
        }
    }

    pub fn can_view_squad(&self, squad_id: &str, admin_squads: &[AdminSquad]) -> bool {
        match self.role {
            Role::SuperAdmin => true,
            Role::Admin => admin_squads
                .iter()
                .any(|link| link.admin_id == self.user_id && link.squad_id == squad_id),
            Role::User => false,
        }
    }

    pub fn can_read_goals(&self, owner_id: &str) -> bool {
        self.user_id == owner_id || self.role.is_admin()
    }

    pub fn can_write_goals(&self, owner_id: &str) -> bool {
        self.user_id == owner_id
    }
}

pub fn squad_member_ids(squad_id: &str, members: &[SquadMember]) -> Vec<String> {
    members
        .iter()
        .filter(|member| member.squad_id == squad_id)
        .map(|member| member.profile_id.clone())
        .unique()
        .collect_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squads() -> Vec<Squad> {
        ["s1", "s2", "s3"]
            .iter()
            .map(|id| Squad {
                id: id.to_string(),
                name: format!("Squad {id}"),
            })
            .collect()
    }

    fn links() -> Vec<AdminSquad> {
        vec![
            AdminSquad {
                admin_id: "admin".to_owned(),
                squad_id: "s2".to_owned(),
            },
            AdminSquad {
                admin_id: "other".to_owned(),
                squad_id: "s3".to_owned(),
            },
        ]
    }

    fn ids(squads: Vec<&Squad>) -> Vec<&str> {
        squads.into_iter().map(|squad| squad.id.as_str()).collect()
    }

    #[test]
    fn squad_visibility() {
        let squads = squads();
        let links = links();
        assert_eq!(
            ids(Caller::new("root", Role::SuperAdmin).visible_squads(&squads, &links)),
            vec!["s1", "s2", "s3"]
        );
        let admin = Caller::new("admin", Role::Admin);
        assert_eq!(ids(admin.visible_squads(&squads, &links)), vec!["s2"]);
        assert!(admin.can_view_squad("s2", &links));
        assert!(!admin.can_view_squad("s3", &links));
        let user = Caller::new("admin", Role::User);
        assert!(user.visible_squads(&squads, &links).is_empty());
        assert!(!user.can_view_squad("s2", &links));
    }

    #[test]
    fn permissions() {
        let user = Caller::new("u1", Role::User);
        assert!(!user.can_export_reports());
        assert!(user.can_read_goals("u1"));
        assert!(!user.can_read_goals("u2"));
        assert!(user.can_write_goals("u1"));

        let admin = Caller::new("a1", Role::Admin);
        assert!(admin.can_export_reports());
        assert!(admin.can_read_goals("u1"));
        assert!(!admin.can_write_goals("u1"));
        assert!(Caller::new("s", Role::SuperAdmin).can_export_reports());
    }

    #[test]
    fn members() {
        let members = [("s1", "a"), ("s2", "b"), ("s1", "c"), ("s1", "a")]
            .iter()
            .map(|(squad, profile)| SquadMember {
                squad_id: squad.to_string(),
                profile_id: profile.to_string(),
            })
            .collect_vec();
        assert_eq!(squad_member_ids("s1", &members), vec!["a", "c"]);
        assert!(squad_member_ids("s9", &members).is_empty());
    }
}

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_roles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub role_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::roles::Entity",
        from = "Column::RoleId",
        to = "super::roles::Column::Id"
    )]
    Roles,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::roles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Roles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, ModelTrait, QueryTrait};

    use crate::entity::{roles, users};

    #[test]
    fn user_roles_resolve_through_join_table() {
        let user = users::Model {
            id: 5,
            first_name: "Test".into(),
            last_name: "User".into(),
            email: "user5@email.com".into(),
            password: "hash".into(),
        };
        let sql = user
            .find_related(roles::Entity)
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#"INNER JOIN "user_roles""#), "{sql}");
        assert!(sql.contains(r#"FROM "roles""#), "{sql}");
    }
}

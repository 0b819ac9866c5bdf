use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::authz::{
    AccessStore, AuthError, CenterAssignment, Directory, LoginIdentity, Principal, RoleGrant,
    ScopeFilter,
};

use super::models::{Center, DocumentType, Regional, RoleSummary, UserSummary};

/// Postgres-backed implementation of both store ports. All operations are
/// plain read queries plus the two insert endpoints; authorization needs no
/// transaction discipline beyond current committed state.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessStore for PgStore {
    async fn load_principal(&self, id: Uuid) -> Result<Option<Principal>, AuthError> {
        let user_row = sqlx::query(
            "SELECT id, name, regional_id FROM users WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(user_row) = user_row else {
            return Ok(None);
        };

        let role_rows = sqlx::query(
            r#"
            SELECT r.id, r.name, (ur.is_active AND r.is_active) AS is_active
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            WHERE ur.user_id = $1
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let mut roles = Vec::with_capacity(role_rows.len());
        for role_row in role_rows {
            let role_id: Uuid = role_row.get("id");
            let permissions = sqlx::query_scalar::<_, String>(
                r#"
                SELECT p.name
                FROM role_permissions rp
                JOIN permissions p ON p.id = rp.permission_id
                WHERE rp.role_id = $1
                "#,
            )
            .bind(role_id)
            .fetch_all(&self.pool)
            .await?;

            roles.push(RoleGrant {
                name: role_row.get("name"),
                is_active: role_row.get("is_active"),
                permissions,
            });
        }

        let direct_permissions = sqlx::query_scalar::<_, String>(
            r#"
            SELECT p.name
            FROM user_permissions up
            JOIN permissions p ON p.id = up.permission_id
            WHERE up.user_id = $1
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let center_rows = sqlx::query(
            r#"
            SELECT c.id, c.regional_id, (uc.is_active AND c.is_active) AS is_active
            FROM user_centers uc
            JOIN centers c ON c.id = uc.center_id
            WHERE uc.user_id = $1
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let centers = center_rows
            .into_iter()
            .map(|row| CenterAssignment {
                center_id: row.get("id"),
                regional_id: row.get("regional_id"),
                is_active: row.get("is_active"),
            })
            .collect();

        Ok(Some(Principal {
            id: user_row.get("id"),
            name: user_row.get("name"),
            regional_id: user_row.get("regional_id"),
            roles,
            direct_permissions,
            centers,
        }))
    }

    async fn center_regional(&self, center_id: Uuid) -> Result<Option<Uuid>, AuthError> {
        let regional_id =
            sqlx::query_scalar::<_, Uuid>("SELECT regional_id FROM centers WHERE id = $1")
                .bind(center_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(regional_id)
    }
}

#[async_trait]
impl Directory for PgStore {
    async fn ping(&self) -> Result<(), AuthError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_login(&self, email: &str) -> Result<Option<LoginIdentity>, AuthError> {
        let row = sqlx::query(
            "SELECT id, password_hash FROM users WHERE email = $1 AND is_active = true",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| LoginIdentity {
            id: row.get("id"),
            password_hash: row.get("password_hash"),
        }))
    }

    async fn list_regionals(&self, filter: &ScopeFilter) -> Result<Vec<Regional>, AuthError> {
        let regionals = match filter {
            ScopeFilter::All => {
                sqlx::query_as::<_, Regional>(
                    "SELECT id, name, is_active FROM regionals ORDER BY name",
                )
                .fetch_all(&self.pool)
                .await?
            }
            ScopeFilter::Regional(id) => {
                sqlx::query_as::<_, Regional>(
                    "SELECT id, name, is_active FROM regionals WHERE id = $1",
                )
                .bind(id)
                .fetch_all(&self.pool)
                .await?
            }
            ScopeFilter::Centers { regional_ids, .. } => {
                sqlx::query_as::<_, Regional>(
                    "SELECT id, name, is_active FROM regionals WHERE id = ANY($1) ORDER BY name",
                )
                .bind(regional_ids)
                .fetch_all(&self.pool)
                .await?
            }
            ScopeFilter::Nothing => Vec::new(),
        };
        Ok(regionals)
    }

    async fn get_regional(&self, id: Uuid) -> Result<Option<Regional>, AuthError> {
        let regional = sqlx::query_as::<_, Regional>(
            "SELECT id, name, is_active FROM regionals WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(regional)
    }

    async fn create_regional(&self, name: &str) -> Result<Regional, AuthError> {
        let regional = sqlx::query_as::<_, Regional>(
            r#"
            INSERT INTO regionals (id, name, is_active)
            VALUES ($1, $2, true)
            RETURNING id, name, is_active
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(regional)
    }

    async fn list_centers(&self, filter: &ScopeFilter) -> Result<Vec<Center>, AuthError> {
        let centers = match filter {
            ScopeFilter::All => {
                sqlx::query_as::<_, Center>(
                    "SELECT id, name, regional_id, is_active FROM centers ORDER BY name",
                )
                .fetch_all(&self.pool)
                .await?
            }
            ScopeFilter::Regional(id) => {
                sqlx::query_as::<_, Center>(
                    "SELECT id, name, regional_id, is_active FROM centers WHERE regional_id = $1 ORDER BY name",
                )
                .bind(id)
                .fetch_all(&self.pool)
                .await?
            }
            ScopeFilter::Centers { center_ids, .. } => {
                sqlx::query_as::<_, Center>(
                    "SELECT id, name, regional_id, is_active FROM centers WHERE id = ANY($1) ORDER BY name",
                )
                .bind(center_ids)
                .fetch_all(&self.pool)
                .await?
            }
            ScopeFilter::Nothing => Vec::new(),
        };
        Ok(centers)
    }

    async fn get_center(&self, id: Uuid) -> Result<Option<Center>, AuthError> {
        let center = sqlx::query_as::<_, Center>(
            "SELECT id, name, regional_id, is_active FROM centers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(center)
    }

    async fn create_center(&self, name: &str, regional_id: Uuid) -> Result<Center, AuthError> {
        let regional_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM regionals WHERE id = $1)")
                .bind(regional_id)
                .fetch_one(&self.pool)
                .await?;
        if !regional_exists {
            return Err(AuthError::ResourceNotFound("regional"));
        }

        let center = sqlx::query_as::<_, Center>(
            r#"
            INSERT INTO centers (id, name, regional_id, is_active)
            VALUES ($1, $2, $3, true)
            RETURNING id, name, regional_id, is_active
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(regional_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(center)
    }

    async fn list_users(&self, filter: &ScopeFilter) -> Result<Vec<UserSummary>, AuthError> {
        let users = match filter {
            ScopeFilter::All => {
                sqlx::query_as::<_, UserSummary>(
                    "SELECT id, name, email, is_active, regional_id FROM users ORDER BY name",
                )
                .fetch_all(&self.pool)
                .await?
            }
            ScopeFilter::Regional(id) => {
                // Users homed in the regional or assigned to one of its centers
                sqlx::query_as::<_, UserSummary>(
                    r#"
                    SELECT u.id, u.name, u.email, u.is_active, u.regional_id
                    FROM users u
                    WHERE u.regional_id = $1
                       OR EXISTS (
                            SELECT 1
                            FROM user_centers uc
                            JOIN centers c ON c.id = uc.center_id
                            WHERE uc.user_id = u.id AND c.regional_id = $1
                          )
                    ORDER BY u.name
                    "#,
                )
                .bind(id)
                .fetch_all(&self.pool)
                .await?
            }
            ScopeFilter::Centers { center_ids, .. } => {
                sqlx::query_as::<_, UserSummary>(
                    r#"
                    SELECT u.id, u.name, u.email, u.is_active, u.regional_id
                    FROM users u
                    WHERE EXISTS (
                        SELECT 1 FROM user_centers uc
                        WHERE uc.user_id = u.id AND uc.center_id = ANY($1)
                    )
                    ORDER BY u.name
                    "#,
                )
                .bind(center_ids)
                .fetch_all(&self.pool)
                .await?
            }
            ScopeFilter::Nothing => Vec::new(),
        };
        Ok(users)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserSummary>, AuthError> {
        let user = sqlx::query_as::<_, UserSummary>(
            "SELECT id, name, email, is_active, regional_id FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list_roles(&self) -> Result<Vec<RoleSummary>, AuthError> {
        let roles =
            sqlx::query_as::<_, RoleSummary>("SELECT id, name, is_active FROM roles ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(roles)
    }

    async fn list_document_types(&self) -> Result<Vec<DocumentType>, AuthError> {
        let document_types = sqlx::query_as::<_, DocumentType>(
            "SELECT id, name, is_active FROM document_types ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(document_types)
    }
}

//! Bulk profile import from the identity provider's user list.

use serde::Serialize;
use tracing::{info, warn};

use cargotrack_auth::ProviderUser;
use cargotrack_core::error::ErrorKind;
use cargotrack_core::result::AppResult;
use cargotrack_entity::profile::ProfileData;

use super::service::{DirectoryService, fill_profile};

/// How existing profiles are treated during an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Only create profiles that do not exist yet.
    CreateMissing,
    /// Create missing profiles and update those whose fields changed.
    CreateOrUpdate,
}

/// Counts produced by an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Users without a username or email, or whose email is taken.
    pub skipped: usize,
    pub dry_run: bool,
}

/// Profile fields for a provider user, if it has both a username and an email.
pub fn profile_from_provider_user(user: &ProviderUser) -> Option<ProfileData> {
    let email = user.email()?.to_string();
    let username = user.meta("username").or_else(|| user.meta("name"))?.to_string();
    Some(fill_profile(user.id.clone(), email, username, |key| {
        user.meta(key).map(str::to_string)
    }))
}

impl DirectoryService {
    /// Imports provider users into the directory.
    ///
    /// With `dry_run` set nothing is written; the report shows what would be.
    pub async fn import(
        &self,
        users: &[ProviderUser],
        mode: ImportMode,
        dry_run: bool,
    ) -> AppResult<ImportReport> {
        let mut report = ImportReport {
            dry_run,
            ..ImportReport::default()
        };

        for user in users {
            let Some(data) = profile_from_provider_user(user) else {
                warn!(user_id = %user.id, "Skipping user without username or email");
                report.skipped += 1;
                continue;
            };

            match self.profiles.find_by_user_id(&data.user_id).await? {
                None => {
                    if !dry_run {
                        match self.profiles.insert(data).await {
                            Ok(_) => {}
                            Err(e) if e.is(ErrorKind::Conflict) => {
                                warn!(user_id = %user.id, error = %e, "Skipping user");
                                report.skipped += 1;
                                continue;
                            }
                            Err(e) => return Err(e),
                        }
                    }
                    report.created += 1;
                }
                Some(existing) if mode == ImportMode::CreateOrUpdate && existing.differs_from(&data) => {
                    if !dry_run {
                        match self.profiles.upsert(data).await {
                            Ok(_) => {}
                            Err(e) if e.is(ErrorKind::Conflict) => {
                                warn!(user_id = %user.id, error = %e, "Skipping user");
                                report.skipped += 1;
                                continue;
                            }
                            Err(e) => return Err(e),
                        }
                    }
                    report.updated += 1;
                }
                Some(_) => report.unchanged += 1,
            }
        }

        info!(
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            skipped = report.skipped,
            dry_run,
            "Profile import finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use cargotrack_core::config::DirectoryConfig;
    use cargotrack_database::{MemoryDatabase, ProfileStore};
    use serde_json::json;

    fn users() -> Vec<ProviderUser> {
        serde_json::from_value(json!([
            {"id": "u1", "email": "abby@x.test", "user_metadata": {"username": "abby", "phone": "1"}},
            {"id": "u2", "email": "bo@x.test", "user_metadata": {"name": "Bo"}},
            {"id": "u3", "email": null, "user_metadata": {"username": "ghost"}},
            {"id": "u4", "email": "nameless@x.test", "user_metadata": {}}
        ]))
        .unwrap()
    }

    fn directory() -> (DirectoryService, Arc<MemoryDatabase>) {
        let db = Arc::new(MemoryDatabase::new());
        (DirectoryService::new(db.clone(), &DirectoryConfig::default()), db)
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let (dir, db) = directory();
        let report = dir.import(&users(), ImportMode::CreateMissing, true).await.unwrap();
        assert_eq!(report.created, 2);
        assert_eq!(report.skipped, 2);
        assert!(db.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_missing_leaves_existing_alone() {
        let (dir, db) = directory();
        dir.import(&users(), ImportMode::CreateMissing, false).await.unwrap();
        assert_eq!(
            db.find_by_user_id("u1").await.unwrap().unwrap().telephone,
            "1"
        );

        let mut changed = users();
        changed[0].user_metadata.insert("city".into(), json!("Oslo"));

        let report = dir.import(&changed, ImportMode::CreateMissing, false).await.unwrap();
        assert_eq!((report.created, report.updated, report.unchanged), (0, 0, 2));

        let report = dir.import(&changed, ImportMode::CreateOrUpdate, false).await.unwrap();
        assert_eq!((report.created, report.updated, report.unchanged), (0, 1, 1));
        assert_eq!(db.find_by_user_id("u1").await.unwrap().unwrap().city, "Oslo");
    }

    #[tokio::test]
    async fn test_email_taken_on_update_is_skipped_and_run_continues() {
        let (dir, db) = directory();
        dir.import(&users(), ImportMode::CreateMissing, false).await.unwrap();

        let next: Vec<ProviderUser> = serde_json::from_value(json!([
            {"id": "u2", "email": "abby@x.test", "user_metadata": {"name": "Bo"}},
            {"id": "u5", "email": "cy@x.test", "user_metadata": {"username": "cy"}}
        ]))
        .unwrap();

        let report = dir.import(&next, ImportMode::CreateOrUpdate, false).await.unwrap();
        assert_eq!((report.created, report.updated, report.skipped), (1, 0, 1));
        assert_eq!(db.find_by_user_id("u2").await.unwrap().unwrap().email, "bo@x.test");
        assert!(db.find_by_user_id("u5").await.unwrap().is_some());
    }
}

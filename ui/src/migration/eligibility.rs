//! Which synchronized accounts may be migrated

use super::types::{Address, App, ErrorSource};

/// No error, or only an error left by a previous migration attempt
pub fn is_migratable(account: &Address) -> bool {
    if account.migrated {
        return false;
    }
    match &account.error {
        None => true,
        Some(error) => error.source == ErrorSource::Migration,
    }
}

/// Apps with their accounts narrowed to the migratable ones; apps left
/// without accounts are dropped
pub fn migratable_apps(apps: &[App]) -> Vec<App> {
    apps.iter()
        .filter_map(|app| {
            let accounts: Vec<Address> = app.accounts.iter().filter(|a| is_migratable(a)).cloned().collect();
            if accounts.is_empty() {
                None
            } else {
                Some(App {
                    accounts,
                    ..app.clone()
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Bip44Path;
    use crate::migration::types::AccountError;
    use crate::services::errors::LedgerErrorKind;

    fn account(address: &str, source: Option<ErrorSource>) -> Address {
        let mut account = Address::new(address, "0x00", Bip44Path::new(434, 0));
        account.error = source.map(|s| AccountError::from_kind(s, LedgerErrorKind::ExecutionError));
        account
    }

    fn app(id: &str, accounts: Vec<Address>) -> App {
        let mut app = App::loading(id, id, "TKN", 12);
        app.accounts = accounts;
        app
    }

    #[test]
    fn test_only_clean_or_migration_errors_survive() {
        let apps = vec![
            app(
                "kusama",
                vec![
                    account("clean", None),
                    account("retry", Some(ErrorSource::Migration)),
                    account("balance", Some(ErrorSource::BalanceFetch)),
                    account("sync", Some(ErrorSource::Synchronization)),
                ],
            ),
            app("acala", vec![account("broken", Some(ErrorSource::BalanceFetch))]),
        ];

        let result = migratable_apps(&apps);
        assert_eq!(result.len(), 1);
        let addresses: Vec<&str> = result[0].accounts.iter().map(|a| a.address.as_str()).collect();
        assert_eq!(addresses, vec!["clean", "retry"]);

        for app in &result {
            for account in &app.accounts {
                assert!(account.error.as_ref().map(|e| e.source == ErrorSource::Migration).unwrap_or(true));
            }
        }
    }

    #[test]
    fn test_migrated_accounts_are_excluded() {
        let mut done = account("done", None);
        done.migrated = true;
        assert!(migratable_apps(&[app("kusama", vec![done])]).is_empty());
    }
}

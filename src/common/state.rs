// Application state shared across all modules

use std::sync::Arc;

use crate::accounts::models::AccountRecord;
use crate::accounts::validators::account_rules;
use crate::common::config::AppConfig;
use crate::common::validation::RuleSet;

/// Configuration plus the rule tables built from it at startup
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub account_rules: Arc<RuleSet<AccountRecord>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, regex::Error> {
        let account_rules = Arc::new(account_rules(config.product_name_rule)?);
        Ok(Self {
            config,
            account_rules,
        })
    }
}

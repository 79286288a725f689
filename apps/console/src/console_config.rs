use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use skmis_application::{FilterState, FilterValue, ListPageConfig, SelectionScope};
use skmis_core::{AppError, AppResult, CurrentUser, Role};
use tracing_subscriber::EnvFilter;

/// Record collection the console operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Announcements,
    Awards,
    Directory,
    Profiles,
    SkOfficials,
    Templates,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Announcements => "announcements",
            Self::Awards => "awards",
            Self::Directory => "directory",
            Self::Profiles => "profiles",
            Self::SkOfficials => "sk-officials",
            Self::Templates => "templates",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "announcements" => Ok(Self::Announcements),
            "awards" => Ok(Self::Awards),
            "directory" => Ok(Self::Directory),
            "profiles" => Ok(Self::Profiles),
            "sk-officials" | "sk_officials" => Ok(Self::SkOfficials),
            "templates" => Ok(Self::Templates),
            _ => Err(AppError::Validation(format!(
                "unknown SKMIS_RESOURCE value '{value}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub resource: ResourceKind,
    pub items_per_page: usize,
    pub selection_scope: SelectionScope,
    pub request_timeout_secs: u64,
    pub notification_secs: u64,
    pub current_user: CurrentUser,
    pub filters: FilterState,
    pub page: usize,
    pub assume_yes: bool,
    pub server_filtering: bool,
}

impl ConsoleConfig {
    pub fn load() -> AppResult<Self> {
        let api_base_url = required_env("SKMIS_API_BASE_URL")?
            .trim()
            .trim_end_matches('/')
            .to_owned();
        let api_token = optional_env("SKMIS_API_TOKEN");
        let resource = optional_env("SKMIS_RESOURCE")
            .map(|value| value.parse::<ResourceKind>())
            .transpose()?
            .unwrap_or(ResourceKind::Announcements);
        let items_per_page = parse_env_usize("SKMIS_ITEMS_PER_PAGE", 10)?;
        let selection_scope = optional_env("SKMIS_SELECTION_SCOPE")
            .map(|value| value.parse::<SelectionScope>())
            .transpose()?
            .unwrap_or_default();
        let request_timeout_secs = parse_env_u64("SKMIS_REQUEST_TIMEOUT_SECS", 15)?;
        let notification_secs = parse_env_u64("SKMIS_NOTIFICATION_SECS", 3)?;
        let role = optional_env("SKMIS_USER_ROLE")
            .map(|value| value.parse::<Role>())
            .transpose()?
            .unwrap_or(Role::Admin);
        let current_user = CurrentUser::new(role, optional_env("SKMIS_USER_STATION"));
        let page = parse_env_usize("SKMIS_PAGE", 1)?;
        let assume_yes = env::var("SKMIS_ASSUME_YES")
            .unwrap_or_else(|_| "false".to_owned())
            .trim()
            .eq_ignore_ascii_case("true");
        let server_filtering = env::var("SKMIS_SERVER_FILTERING")
            .unwrap_or_else(|_| "false".to_owned())
            .trim()
            .eq_ignore_ascii_case("true");

        if api_base_url.is_empty() {
            return Err(AppError::Validation(
                "SKMIS_API_BASE_URL must not be empty".to_owned(),
            ));
        }

        if items_per_page == 0 {
            return Err(AppError::Validation(
                "SKMIS_ITEMS_PER_PAGE must be greater than zero".to_owned(),
            ));
        }

        if request_timeout_secs == 0 {
            return Err(AppError::Validation(
                "SKMIS_REQUEST_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        let filters = FilterState {
            search_query: env::var("SKMIS_SEARCH").unwrap_or_default(),
            category: FilterValue::parse(&env::var("SKMIS_CATEGORY").unwrap_or_default()),
            status: FilterValue::parse(&env::var("SKMIS_STATUS").unwrap_or_default()),
            ..FilterState::default()
        };

        Ok(Self {
            api_base_url,
            api_token,
            resource,
            items_per_page,
            selection_scope,
            request_timeout_secs,
            notification_secs,
            current_user,
            filters,
            page,
            assume_yes,
            server_filtering,
        })
    }

    pub fn list_page_config(&self, selection_scope: SelectionScope) -> ListPageConfig {
        ListPageConfig {
            items_per_page: self.items_per_page,
            selection_scope,
            notification_duration: Duration::from_secs(self.notification_secs),
            server_filtering: self.server_filtering,
        }
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_env_usize(name: &str, default: usize) -> AppResult<usize> {
    match env::var(name) {
        Ok(value) => value.trim().parse::<usize>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_env_u64(name: &str, default: u64) -> AppResult<u64> {
    match env::var(name) {
        Ok(value) => value.trim().parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use skmis_core::AppError;

    use super::ResourceKind;

    #[test]
    fn resource_kind_accepts_both_official_spellings() {
        assert!(matches!(
            "sk_officials".parse::<ResourceKind>(),
            Ok(ResourceKind::SkOfficials)
        ));
        assert!(matches!(
            " Profiles ".parse::<ResourceKind>(),
            Ok(ResourceKind::Profiles)
        ));
        assert!(matches!(
            "events".parse::<ResourceKind>(),
            Err(AppError::Validation(_))
        ));
    }
}

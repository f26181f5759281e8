use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use shared::{
    domain::{AdminStats, CourseSummary, User},
    error::ParseDomainError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Home,
    Login,
    Register,
    Courses,
    Dashboard,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Home,
        View::Login,
        View::Register,
        View::Courses,
        View::Dashboard,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Login => "login",
            Self::Register => "register",
            Self::Courses => "courses",
            Self::Dashboard => "dashboard",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = ParseDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        View::ALL
            .into_iter()
            .find(|view| view.as_str() == wanted)
            .ok_or(ParseDomainError::UnknownView(wanted))
    }
}

/// Role-specific extras shown on the dashboard, loaded on demand.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum DashboardData {
    #[default]
    NotLoaded,
    Admin(AdminStats),
    Instructor(Vec<CourseSummary>),
    Student,
}

/// Read-only copy of the controller state handed to the view layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub active_view: View,
    pub courses: Vec<CourseSummary>,
    pub dashboard: DashboardData,
    pub pending_request: bool,
    pub last_error: Option<String>,
    pub has_token: bool,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    UserChanged(Option<User>),
    ViewChanged(View),
    CoursesLoaded { count: usize },
    PendingChanged(bool),
    Error(String),
    DashboardLoaded,
}

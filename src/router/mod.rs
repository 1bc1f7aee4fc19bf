//! Page routes and document titles.

use serde::Serialize;
use tracing::{debug, warn};

/// Suffix appended to every page title.
pub const APP_TITLE: &str = "质量知识图谱助手";

/// A navigable page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub title: &'static str,
}

impl Route {
    /// Document title shown while this page is open.
    pub fn document_title(&self) -> String {
        format!("{} - {}", self.title, APP_TITLE)
    }
}

/// Every page of the application.
pub const ROUTES: &[Route] = &[
    Route {
        path: "/",
        name: "Home",
        title: "首页",
    },
    Route {
        path: "/extract",
        name: "DocumentExtraction",
        title: "文档解析",
    },
    Route {
        path: "/graph",
        name: "GraphExplorer",
        title: "知识图谱",
    },
    Route {
        path: "/graph-viz",
        name: "GraphVisualization",
        title: "图谱可视化",
    },
    Route {
        path: "/dictionary",
        name: "DictionaryManagement",
        title: "词典管理",
    },
    Route {
        path: "/governance",
        name: "DataGovernance",
        title: "数据治理",
    },
    Route {
        path: "/system-management",
        name: "SystemManagement",
        title: "系统管理",
    },
    Route {
        path: "/test",
        name: "Test",
        title: "测试页面",
    },
];

/// Find the route for `path`, ignoring a query string, fragment, or
/// trailing slash.
pub fn resolve(path: &str) -> Option<&'static Route> {
    let path = path.split(|c: char| c == '?' || c == '#').next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    let normalized = if trimmed.is_empty() { "/" } else { trimmed };
    ROUTES.iter().find(|r| r.path == normalized)
}

/// Tracks the current page and document title.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: Option<&'static Route>,
    title: String,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            current: None,
            title: APP_TITLE.to_string(),
        }
    }

    /// Go to `path`. Unknown paths leave the current page and title as is.
    pub fn navigate(&mut self, path: &str) -> Option<&'static Route> {
        match resolve(path) {
            Some(route) => {
                self.current = Some(route);
                self.title = route.document_title();
                debug!(path = %route.path, title = %self.title, "Navigated");
                Some(route)
            }
            None => {
                warn!(path = %path, "No route for path");
                None
            }
        }
    }

    pub fn current(&self) -> Option<&'static Route> {
        self.current
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

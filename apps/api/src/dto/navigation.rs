use psephos_domain::MenuNode;
use serde::Serialize;
use ts_rs::TS;

/// API representation of one visible navigation entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/menu-node-response.ts"
)]
pub struct MenuNodeResponse {
    pub name: String,
    pub path: Option<String>,
    pub icon: Option<String>,
    pub children: Vec<MenuNodeResponse>,
}

/// API representation of the pruned sidebar for the current user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/navigation-response.ts"
)]
pub struct NavigationResponse {
    pub items: Vec<MenuNodeResponse>,
}

impl From<&MenuNode> for MenuNodeResponse {
    fn from(value: &MenuNode) -> Self {
        Self {
            name: value.name().to_owned(),
            path: value.path().map(ToOwned::to_owned),
            icon: value.icon().map(ToOwned::to_owned),
            children: value.children().iter().map(MenuNodeResponse::from).collect(),
        }
    }
}

impl From<Vec<MenuNode>> for NavigationResponse {
    fn from(value: Vec<MenuNode>) -> Self {
        Self {
            items: value.iter().map(MenuNodeResponse::from).collect(),
        }
    }
}

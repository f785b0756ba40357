//! Role-based access: pages, navigation menus, mutating actions and data scope

use crate::errors::{CadastreError, Result};
use crate::schemas::{Dataset, Permit, Procedure, UserRole};

use super::Session;

use crate::schemas::UserRole::{Administrator, CadastreAgent, CommitteeMember, Operator};

/// A screen of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Dashboard,
    OperatorDashboard,
    Permits,
    MyPermits,
    PermitDetail,
    Procedures,
    MyProcedures,
    ProcedureDetail,
    NewPermit,
    DocumentValidation,
    CommitteeDecisions,
    Workflows,
    Perimeters,
    Entities,
    MyEntity,
    Search,
    Settings,
}

impl Page {
    pub const ALL: &'static [Page] = &[
        Page::Home,
        Page::Dashboard,
        Page::OperatorDashboard,
        Page::Permits,
        Page::MyPermits,
        Page::PermitDetail,
        Page::Procedures,
        Page::MyProcedures,
        Page::ProcedureDetail,
        Page::NewPermit,
        Page::DocumentValidation,
        Page::CommitteeDecisions,
        Page::Workflows,
        Page::Perimeters,
        Page::Entities,
        Page::MyEntity,
        Page::Search,
        Page::Settings,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Dashboard => "/dashboard",
            Page::OperatorDashboard => "/operator-dashboard",
            Page::Permits => "/permits",
            Page::MyPermits => "/my-permits",
            Page::PermitDetail => "/permits/:id",
            Page::Procedures => "/procedures",
            Page::MyProcedures => "/my-procedures",
            Page::ProcedureDetail => "/procedures/:id",
            Page::NewPermit => "/new-permit",
            Page::DocumentValidation => "/document-validation",
            Page::CommitteeDecisions => "/committee-decisions",
            Page::Workflows => "/workflows",
            Page::Perimeters => "/perimeters",
            Page::Entities => "/entities",
            Page::MyEntity => "/my-entity",
            Page::Search => "/search",
            Page::Settings => "/settings",
        }
    }

    /// Roles allowed on the page; `None` admits any authenticated user
    pub fn allowed_roles(&self) -> Option<&'static [UserRole]> {
        match self {
            Page::Dashboard => Some(&[Administrator, CadastreAgent, CommitteeMember]),
            Page::OperatorDashboard | Page::MyPermits | Page::MyProcedures | Page::MyEntity => {
                Some(&[Operator])
            }
            Page::Permits
            | Page::DocumentValidation
            | Page::Workflows
            | Page::Perimeters => Some(&[Administrator, CadastreAgent]),
            Page::NewPermit => Some(&[Administrator, Operator]),
            Page::CommitteeDecisions => Some(&[Administrator, CommitteeMember]),
            Page::Entities | Page::Settings => Some(&[Administrator]),
            Page::Home
            | Page::PermitDetail
            | Page::Procedures
            | Page::ProcedureDetail
            | Page::Search => None,
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

impl std::str::FromStr for Page {
    type Err = String;

    /// Accepts a path (`/permits`) or its bare name (`permits`)
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches('/');
        Page::ALL
            .iter()
            .find(|p| p.path().trim_start_matches('/') == wanted)
            .copied()
            .ok_or_else(|| format!("Unknown Page: {}", s))
    }
}

/// Outcome of a page access check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// No session: send to the login screen
    RedirectLogin,
    /// Authenticated, but the role is not admitted
    RedirectUnauthorized,
}

pub fn authorize(session: Option<&Session>, page: Page) -> Access {
    let session = match session {
        Some(session) => session,
        None => return Access::RedirectLogin,
    };
    match page.allowed_roles() {
        Some(roles) if !roles.contains(&session.role()) => Access::RedirectUnauthorized,
        _ => Access::Granted,
    }
}

/// One entry of the sidebar menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub page: Page,
}

const fn nav(label: &'static str, page: Page) -> NavItem {
    NavItem { label, page }
}

const ADMIN_MENU: &[NavItem] = &[
    nav("Tableau de bord", Page::Dashboard),
    nav("Permis", Page::Permits),
    nav("Procédures", Page::Procedures),
    nav("Nouvelle demande", Page::NewPermit),
    nav("Validation documents", Page::DocumentValidation),
    nav("Décisions comité", Page::CommitteeDecisions),
    nav("Fusion/Substitution", Page::Workflows),
    nav("Périmètres", Page::Perimeters),
    nav("Entités morales", Page::Entities),
    nav("Recherche", Page::Search),
    nav("Paramètres", Page::Settings),
];

const AGENT_MENU: &[NavItem] = &[
    nav("Tableau de bord", Page::Dashboard),
    nav("Procédures", Page::Procedures),
    nav("Validation documents", Page::DocumentValidation),
    nav("Périmètres", Page::Perimeters),
    nav("Recherche", Page::Search),
];

const COMMITTEE_MENU: &[NavItem] = &[
    nav("Tableau de bord", Page::Dashboard),
    nav("Décisions comité", Page::CommitteeDecisions),
    nav("Procédures", Page::Procedures),
    nav("Recherche", Page::Search),
];

const OPERATOR_MENU: &[NavItem] = &[
    nav("Mon tableau de bord", Page::OperatorDashboard),
    nav("Mes permis", Page::MyPermits),
    nav("Mes procédures", Page::MyProcedures),
    nav("Nouvelle demande", Page::NewPermit),
    nav("Mon entreprise", Page::MyEntity),
];

/// Ordered menu for a role
pub fn navigation(role: UserRole) -> &'static [NavItem] {
    match role {
        Administrator => ADMIN_MENU,
        CadastreAgent => AGENT_MENU,
        CommitteeMember => COMMITTEE_MENU,
        Operator => OPERATOR_MENU,
    }
}

/// A state-changing operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    UpdateStep,
    ValidateDocument,
    Decide,
    Suspend,
    Resume,
    SubmitApplication,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::UpdateStep => "update-step",
            Action::ValidateDocument => "validate-document",
            Action::Decide => "decide",
            Action::Suspend => "suspend",
            Action::Resume => "resume",
            Action::SubmitApplication => "submit-application",
        }
    }

    pub fn allowed_roles(&self) -> &'static [UserRole] {
        match self {
            Action::UpdateStep | Action::ValidateDocument => &[Administrator, CadastreAgent],
            Action::Decide => &[Administrator, CommitteeMember],
            Action::Suspend | Action::Resume => &[Administrator],
            Action::SubmitApplication => &[Administrator, Operator],
        }
    }
}

/// Fail with `Forbidden` unless the session's role may perform `action`
pub fn ensure_allowed(session: &Session, action: Action) -> Result<()> {
    if action.allowed_roles().contains(&session.role()) {
        Ok(())
    } else {
        Err(CadastreError::Forbidden(format!(
            "{} may not {}",
            session.role().label(),
            action.as_str()
        )))
    }
}

/// The records a session may see
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    /// Records of one legal entity
    Entity(String),
    /// An operator attached to no entity sees nothing
    Nothing,
}

impl Scope {
    pub fn for_session(session: &Session) -> Self {
        if !session.user.is_operator() {
            return Scope::All;
        }
        match &session.user.entity_id {
            Some(id) => Scope::Entity(id.clone()),
            None => Scope::Nothing,
        }
    }

    pub fn allows_entity(&self, entity_id: &str) -> bool {
        match self {
            Scope::All => true,
            Scope::Entity(id) => id == entity_id,
            Scope::Nothing => false,
        }
    }

    pub fn permits<'a>(&self, dataset: &'a Dataset) -> Vec<&'a Permit> {
        dataset
            .permits
            .iter()
            .filter(|p| self.allows_entity(&p.entity_id))
            .collect()
    }

    pub fn procedures<'a>(&self, dataset: &'a Dataset) -> Vec<&'a Procedure> {
        dataset
            .procedures
            .iter()
            .filter(|p| self.allows_entity(&p.entity_id))
            .collect()
    }
}

use axum::Router;
use service_core::routing::{domain_routes, GroupContext, RouteGroup};

/// Compliance domain areas, each mounted under `/api/compliance/<area>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceGroup {
    Audit,
    Monitoring,
    Security,
    Reporting,
}

impl ComplianceGroup {
    pub const ALL: [ComplianceGroup; 4] = [
        ComplianceGroup::Audit,
        ComplianceGroup::Monitoring,
        ComplianceGroup::Security,
        ComplianceGroup::Reporting,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComplianceGroup::Audit => "audit",
            ComplianceGroup::Monitoring => "monitoring",
            ComplianceGroup::Security => "security",
            ComplianceGroup::Reporting => "reporting",
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            ComplianceGroup::Audit => "/api/compliance/audit",
            ComplianceGroup::Monitoring => "/api/compliance/monitoring",
            ComplianceGroup::Security => "/api/compliance/security",
            ComplianceGroup::Reporting => "/api/compliance/reporting",
        }
    }

    fn description(self) -> &'static str {
        match self {
            ComplianceGroup::Audit => "Audit trail and evidence retrieval",
            ComplianceGroup::Monitoring => "Transaction monitoring and alerts",
            ComplianceGroup::Security => "Access and security control checks",
            ComplianceGroup::Reporting => "Regulatory reporting",
        }
    }
}

impl RouteGroup for ComplianceGroup {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn routes(&self, ctx: &GroupContext) -> Router {
        domain_routes(self.as_str(), self.description(), ctx)
    }
}

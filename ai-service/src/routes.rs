use axum::Router;
use service_core::routing::{domain_routes, GroupContext, RouteGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiGroup {
    Fraud,
    Risk,
    Recommendations,
    Analytics,
}

impl AiGroup {
    pub const ALL: [AiGroup; 4] = [
        AiGroup::Fraud,
        AiGroup::Risk,
        AiGroup::Recommendations,
        AiGroup::Analytics,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AiGroup::Fraud => "fraud",
            AiGroup::Risk => "risk",
            AiGroup::Recommendations => "recommendations",
            AiGroup::Analytics => "analytics",
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            AiGroup::Fraud => "/api/ai/fraud",
            AiGroup::Risk => "/api/ai/risk",
            AiGroup::Recommendations => "/api/ai/recommendations",
            AiGroup::Analytics => "/api/ai/analytics",
        }
    }

    fn description(self) -> &'static str {
        match self {
            AiGroup::Fraud => "Transaction fraud detection",
            AiGroup::Risk => "Credit and account risk assessment",
            AiGroup::Recommendations => "Personalised product recommendations",
            AiGroup::Analytics => "Customer and portfolio analytics",
        }
    }
}

impl RouteGroup for AiGroup {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn routes(&self, ctx: &GroupContext) -> Router {
        domain_routes(self.as_str(), self.description(), ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service_core::routing::RoutePrefix;

    #[test]
    fn prefixes_are_valid_and_disjoint() {
        let prefixes: Vec<_> = AiGroup::ALL
            .iter()
            .map(|g| RoutePrefix::parse(g.prefix()).unwrap())
            .collect();

        for (i, a) in prefixes.iter().enumerate() {
            for b in &prefixes[i + 1..] {
                assert!(!a.overlaps(b), "{a} overlaps {b}");
            }
        }
    }

    #[test]
    fn prefixes_end_with_the_group_name() {
        for group in AiGroup::ALL {
            assert!(group.prefix().starts_with("/api/ai/"));
            assert!(group.prefix().ends_with(group.as_str()));
        }
    }
}

//! Report views: short names mapped onto the analytics tables the
//! dashboard charts were built from.

/// Advertised view name to table name.
pub const REPORT_VIEWS: &[(&str, &str)] = &[
    ("personnel", "personnel_analytics"),
    ("specializations", "specialization_analytics"),
    ("readiness", "mission_readiness_trends"),
    ("geography", "geographical_distribution"),
    ("skill-gaps", "skill_gap_analysis"),
    ("security", "security_metrics"),
    ("threats", "threat_intelligence"),
    ("compliance", "compliance_status"),
    ("audit", "audit_logs"),
];

/// Resolve a view name to its table.
pub fn resolve_view(view: &str) -> Option<&'static str> {
    REPORT_VIEWS
        .iter()
        .find(|(name, _)| *name == view)
        .map(|(_, table)| *table)
}

pub fn view_names() -> Vec<&'static str> {
    REPORT_VIEWS.iter().map(|(name, _)| *name).collect()
}

//! Static description of the hosted database schema.
//!
//! This is the single source of truth for what the query translator tells
//! the model about the database, and for resolving report views to tables.
//! It must track the migrations applied to the hosted project; there is no
//! runtime introspection.

/// One table as advertised to the language model.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub name: &'static str,
    /// Short human label used in the schema prompt.
    pub description: &'static str,
    pub columns: &'static [&'static str],
}

pub const SCHEMA: &[TableSchema] = &[
    TableSchema {
        name: "profiles",
        description: "Personnel information",
        columns: &[
            "id",
            "service_number",
            "rank",
            "first_name",
            "last_name",
            "specialization",
            "unit",
            "command",
            "base_location",
            "phone",
            "emergency_contact",
            "date_of_birth",
            "date_of_joining",
            "security_clearance",
            "mission_ready",
            "created_at",
            "updated_at",
        ],
    },
    TableSchema {
        name: "training_records",
        description: "Training data",
        columns: &[
            "id",
            "user_id",
            "training_name",
            "training_type",
            "start_date",
            "end_date",
            "status",
            "completion_score",
            "instructor",
            "location",
            "notes",
            "created_at",
            "updated_at",
        ],
    },
    TableSchema {
        name: "personnel_analytics",
        description: "Aggregated personnel data",
        columns: &["id", "date_recorded", "rank", "count", "percentage", "command"],
    },
    TableSchema {
        name: "specialization_analytics",
        description: "Specialization breakdown",
        columns: &[
            "id",
            "date_recorded",
            "specialization",
            "personnel_count",
            "color_code",
            "command",
        ],
    },
    TableSchema {
        name: "mission_readiness_trends",
        description: "Readiness metrics",
        columns: &[
            "id",
            "month_year",
            "readiness_percentage",
            "training_completion",
            "command",
        ],
    },
    TableSchema {
        name: "geographical_distribution",
        description: "Location-based data",
        columns: &[
            "id",
            "date_recorded",
            "region",
            "personnel_count",
            "bases_count",
            "command_type",
        ],
    },
    TableSchema {
        name: "skill_gap_analysis",
        description: "Skill requirements",
        columns: &[
            "id",
            "date_recorded",
            "skill_name",
            "demand_count",
            "supply_count",
            "gap_count",
            "priority_level",
            "command",
        ],
    },
    TableSchema {
        name: "security_metrics",
        description: "Security data",
        columns: &[
            "id",
            "date_recorded",
            "metric_type",
            "value",
            "severity_level",
            "command",
        ],
    },
    TableSchema {
        name: "audit_logs",
        description: "System logs",
        columns: &[
            "id",
            "user_id",
            "user_name",
            "action",
            "classification",
            "ip_address",
            "user_agent",
            "status",
            "details",
            "created_at",
        ],
    },
    TableSchema {
        name: "threat_intelligence",
        description: "Threat data",
        columns: &[
            "id",
            "threat_type",
            "severity",
            "detection_count",
            "blocked_count",
            "trend",
            "source",
            "last_detected",
            "created_at",
            "updated_at",
        ],
    },
    TableSchema {
        name: "compliance_status",
        description: "Compliance information",
        columns: &[
            "id",
            "framework",
            "compliance_percentage",
            "last_audit_date",
            "next_audit_date",
            "auditor",
            "findings_count",
            "status",
            "created_at",
            "updated_at",
        ],
    },
];

/// Look up a table by name.
pub fn table(name: &str) -> Option<&'static TableSchema> {
    SCHEMA.iter().find(|t| t.name == name)
}

/// Render the schema block used in the translator prompt, one line per
/// table: `- name: Description (col, col, ...)`.
pub fn schema_description() -> String {
    let mut out = String::from("Database Schema:\n");
    for t in SCHEMA {
        out.push_str(&format!(
            "- {}: {} ({})\n",
            t.name,
            t.description,
            t.columns.join(", ")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_table() {
        let t = table("profiles").unwrap();
        assert!(t.columns.contains(&"service_number"));
        assert!(t.columns.contains(&"mission_ready"));
    }

    #[test]
    fn lookup_unknown_table() {
        assert!(table("nonexistent").is_none());
    }

    #[test]
    fn description_lists_every_table() {
        let desc = schema_description();
        for t in SCHEMA {
            assert!(desc.contains(t.name), "missing table {}", t.name);
        }
        assert!(desc.contains("training_records: Training data"));
    }
}

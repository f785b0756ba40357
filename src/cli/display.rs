//! Terminal rendering for command output

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::{current_step, pipeline_for, progress_percentage, tally, IntegrityIssue};
use crate::errors::{CadastreError, Result};
use crate::schemas::{CommitteeDecision, Config, LegalEntity, Permit, Procedure, Substance};
use crate::stats::{Count, DashboardStats, OperatorSummary};
use crate::store::DocumentRow;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| CadastreError::InvalidJson(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

fn day(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%d/%m/%Y %H:%M").to_string()
}

fn entity_name<'a>(entities: &'a [LegalEntity], id: &str) -> &'a str {
    entities
        .iter()
        .find(|e| e.id == id)
        .map_or("-", |e| e.legal_name.as_str())
}

fn substance_name<'a>(substances: &'a [Substance], id: &'a str) -> &'a str {
    substances
        .iter()
        .find(|s| s.id == id)
        .map_or(id, |s| s.name.as_str())
}

pub fn print_permits(permits: &[Permit], entities: &[LegalEntity], today: NaiveDate) {
    if permits.is_empty() {
        println!("No permits found.");
        return;
    }
    println!(
        "{:<12} {:<28} {:<10} {:<10} {:<10}",
        "CODE", "HOLDER", "ISSUED", "EXPIRES", "STATUS"
    );
    for permit in permits {
        println!(
            "{:<12} {:<28} {:<10} {:<10} {:<10}",
            permit.code,
            entity_name(entities, &permit.entity_id),
            day(permit.issued_on),
            day(permit.expires_on),
            permit.status(today).label()
        );
    }
    println!("\n{} permit(s)", permits.len());
}

pub fn print_permit(
    permit: &Permit,
    entities: &[LegalEntity],
    substances: &[Substance],
    procedures: &[Procedure],
    today: NaiveDate,
) {
    println!("Permit {}", permit.code);
    println!("  Holder:    {}", entity_name(entities, &permit.entity_id));
    println!("  Status:    {}", permit.status(today).label());
    println!("  Issued:    {}", day(permit.issued_on));
    println!(
        "  Expires:   {} ({} days)",
        day(permit.expires_on),
        permit.days_until_expiration(today)
    );

    let names: Vec<&str> = permit
        .substance_ids()
        .map(|id| substance_name(substances, id))
        .collect();
    println!("  Substances: {}", names.join(", "));

    println!("\nPerimeter:");
    if permit.perimeter.is_empty() {
        println!("  (no coordinates)");
    }
    for point in permit.ordered_perimeter() {
        println!("  {:>2}. {:.4}, {:.4}, {:.1}", point.order, point.x, point.y, point.z);
    }

    println!("\nProcedures:");
    if procedures.is_empty() {
        println!("  (none)");
    }
    for procedure in procedures {
        println!(
            "  {} {} ({})",
            procedure.code,
            procedure.procedure_type.label(),
            procedure.status.label()
        );
    }
}

pub fn print_procedures(procedures: &[Procedure], entities: &[LegalEntity], config: &Config) {
    if procedures.is_empty() {
        println!("No procedures found.");
        return;
    }
    println!(
        "{:<12} {:<20} {:<28} {:<10} {:>5}  {}",
        "CODE", "TYPE", "ENTITY", "STATUS", "DONE", "CURRENT STEP"
    );
    for procedure in procedures {
        let pipeline = pipeline_for(config, procedure.procedure_type);
        println!(
            "{:<12} {:<20} {:<28} {:<10} {:>4.0}%  {}",
            procedure.code,
            procedure.procedure_type.label(),
            entity_name(entities, &procedure.entity_id),
            procedure.status.label(),
            progress_percentage(procedure, pipeline),
            current_step(procedure).label()
        );
    }
    println!("\n{} procedure(s)", procedures.len());
}

pub fn print_procedure(procedure: &Procedure, entities: &[LegalEntity], config: &Config) {
    let pipeline = pipeline_for(config, procedure.procedure_type);
    println!("Procedure {}", procedure.code);
    println!("  Type:     {}", procedure.procedure_type.label());
    println!("  Entity:   {}", entity_name(entities, &procedure.entity_id));
    println!("  Status:   {}", procedure.status.label());
    println!("  Opened:   {}", day(procedure.created_on));
    if let Some(permit_id) = &procedure.permit_id {
        println!("  Permit:   {}", permit_id);
    }
    println!(
        "  Progress: {:.0}% - {}",
        progress_percentage(procedure, pipeline),
        current_step(procedure).label()
    );

    println!("\nSteps:");
    if procedure.steps.is_empty() {
        println!("  (none)");
    }
    for step in &procedure.steps {
        let ended = step.ended_at.map(timestamp).unwrap_or_default();
        println!(
            "  [{}] {:<24} {:<10} {}",
            step.id,
            step.step_type.label(),
            step.status.label(),
            ended
        );
        if let Some(comment) = &step.comment {
            println!("        {}", comment);
        }
    }

    println!("\nDocuments:");
    if procedure.documents.is_empty() {
        println!("  (none)");
    }
    for document in &procedure.documents {
        println!(
            "  [{}] {:<36} {:<24} {}",
            document.id,
            document.name,
            document.doc_type.label(),
            document.status.label()
        );
    }

    if !procedure.decisions.is_empty() {
        println!("\nCommittee decisions:");
        print_decisions(&procedure.decisions);
    }
}

pub fn print_decisions(decisions: &[CommitteeDecision]) {
    for decision in decisions {
        println!(
            "  {} {} (member {})",
            timestamp(decision.decided_at),
            decision.decision.label(),
            decision.member_id
        );
        if let Some(comment) = &decision.comment {
            println!("    {}", comment);
        }
        if let Some(note) = &decision.note {
            println!("    Note: {}", note);
        }
    }
}

pub fn print_documents(rows: &[DocumentRow]) {
    let counts = tally(rows.iter().map(|r| &r.document));
    println!(
        "Pending: {}  Valid: {}  Rejected: {}",
        counts.pending, counts.valid, counts.rejected
    );
    if rows.is_empty() {
        println!("No documents found.");
        return;
    }
    println!();
    println!(
        "{:<12} {:>3} {:<36} {:<24} {:<28} {}",
        "PROCEDURE", "ID", "NAME", "TYPE", "ENTITY", "STATUS"
    );
    for row in rows {
        println!(
            "{:<12} {:>3} {:<36} {:<24} {:<28} {}",
            row.procedure_code,
            row.document.id,
            row.document.name,
            row.document.doc_type.label(),
            row.entity_name,
            row.document.status.label()
        );
    }
}

fn print_counts<K: std::fmt::Display>(title: &str, counts: &[Count<K>]) {
    println!("\n{}:", title);
    for count in counts {
        println!("  {:<24} {}", count.key.to_string(), count.count);
    }
}

pub fn print_stats(stats: &DashboardStats) {
    println!("Total permits:      {}", stats.total_permits);
    println!("Active procedures:  {}", stats.active_procedures);
    println!("Expired permits:    {}", stats.expired_permits);
    println!("Suspended permits:  {}", stats.suspended_permits);
    print_counts("Permits by region", &stats.permits_by_region);
    print_counts("Permits by status", &stats.permits_by_status);
    print_counts("Procedures by type", &stats.procedures_by_type);
}

pub fn print_summary(summary: &OperatorSummary) {
    println!("My permits:         {}", summary.total_permits);
    println!("Active permits:     {}", summary.active_permits);
    println!("Active procedures:  {}", summary.active_procedures);
    if !summary.expiring_soon.is_empty() {
        println!("\nExpiring soon: {}", summary.expiring_soon.join(", "));
    }
}

pub fn print_entities(entities: &[LegalEntity]) {
    if entities.is_empty() {
        println!("No entities found.");
        return;
    }
    println!(
        "{:>3} {:<28} {:<6} {:<14} {:<16} {}",
        "ID", "NAME", "FORM", "REGISTRY", "REGION", "REPRESENTATIVE"
    );
    for entity in entities {
        println!(
            "{:>3} {:<28} {:<6} {:<14} {:<16} {}",
            entity.id,
            entity.legal_name,
            entity.legal_form,
            entity.registry_number,
            entity.region(),
            entity.legal_representative
        );
    }
}

pub fn print_substances(substances: &[Substance]) {
    println!("{:>3} {:<12} {:<8} {}", "ID", "NAME", "SYMBOL", "FAMILY");
    for substance in substances {
        println!(
            "{:>3} {:<12} {:<8} {}",
            substance.id, substance.name, substance.symbol, substance.family
        );
    }
}

pub fn print_issues(issues: &[IntegrityIssue]) {
    if issues.is_empty() {
        println!("No issues found.");
        return;
    }
    for issue in issues {
        println!("  - {}", issue);
    }
    println!("\n{} issue(s)", issues.len());
}

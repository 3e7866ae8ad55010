//! # Prompt Template Catalog
//!
//! The fixed set of prompt templates used by the assistant. Each builder is a
//! deterministic string construction with no I/O: it embeds the (already
//! bounded) document text verbatim into the instruction. Wording follows the
//! production prompt deck used by the proposal team, so edits here change
//! model behavior directly.

use serde::{Deserialize, Serialize};

/// The system persona sent with every completion request.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant for an architecture firm. \
You answer questions about RFP (Request for Proposal) documents accurately and concisely, \
using only the document text you are given.";

/// The sentence the model must use for any pipeline field it cannot find.
pub const NOT_FOUND_FALLBACK: &str = "Sorry, I could not find that information.";

/// The canned one-click actions offered by the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptAction {
    ExecutiveSummary,
    PipelineData,
}

impl PromptAction {
    /// The user-facing button label, also used as the user message and the
    /// action field on log records.
    pub fn label(&self) -> &'static str {
        match self {
            PromptAction::ExecutiveSummary => "Generate Executive Summary",
            PromptAction::PipelineData => "Generate Pipeline Data",
        }
    }

    /// Builds the full prompt for this action against `document_text`.
    pub fn build_prompt(&self, document_text: &str) -> String {
        match self {
            PromptAction::ExecutiveSummary => executive_summary(document_text),
            PromptAction::PipelineData => pipeline_data(document_text),
        }
    }
}

/// Requests a one-page executive summary: key dates, overview, scope,
/// deliverables, and an alignment statement against the firm's core values.
pub fn executive_summary(document_text: &str) -> String {
    format!(
        "Create an executive summary of this RFP document for the leadership team. Include:\n\
         - Key Dates (RFP release, proposal due date, interviews, selection, project start)\n\
         - Project Overview (client, location, and what is being requested, in two or three sentences)\n\
         - Scope of Work\n\
         - Required Deliverables\n\
         - Alignment with Core Values: briefly state how this opportunity aligns with \
         Design Excellence, Sustainability, Resilience, Innovation, Diversity and Inclusion, \
         Social Purpose, Well-Being, and Technological Innovation.\n\n\
         If a section cannot be determined from the document, say so rather than guessing.\n\n\
         RFP Document Text:\n{document_text}"
    )
}

/// Requests the fixed CRM field schema as a table. Field names and the
/// closed enumerations are part of the downstream CRM contract; do not
/// reword them casually.
pub fn pipeline_data(document_text: &str) -> String {
    format!(
        "Extract and present the following key data points from this RFP document in a table format for CRM entry:\n\
         - Client Name\n\
         - Opportunity Name\n\
         - Primary Contact (name, title, email, and phone)\n\
         - Primary Practice (select from: Branded Environments, Corporate and Commercial, Corporate Interiors, \
         Cultural and Civic, Health, Higher Education, Hospitality, K-12 Education, Landscape Architecture, \
         Planning & Strategies, Science and Technology, Single Family Residential, Sports Recreation and Entertainment, \
         Transportation, Urban Design, Unknown / Other)\n\
         - Discipline (select from: Arch/Interior Design, Urban Design, Landscape Arch, Advisory Services, \
         Branded Environments, Unknown / Other)\n\
         - City\n\
         - State / Province\n\
         - Country\n\
         - RFP Release Date\n\
         - Proposal Due Date\n\
         - Interview Date\n\
         - Selection Date\n\
         - Design Start Date\n\
         - Design Completion Date\n\
         - Construction Start Date\n\
         - Construction Completion Date\n\
         - Project Description (concise one sentence description)\n\
         - Scope(s) of Work (select from: New, Renovation, Addition, Building Repositioning, Competition, \
         Infrastructure, Master Plan, Planning, Programming, Replacement, Study, Unknown / Other)\n\
         - Program Type(s) (select from: Civic and Cultural, Corporate and Commercial, Sports, Recreation + Entertainment, \
         Education, Residential, Science + Technology, Transportation, Misc, Urban Design, Landscape Architecture, \
         Government, Social Purpose, Health, Unknown / Other)\n\
         - Delivery Type (select from: Construction Manager at Risk (CMaR), Design Only, Design-Bid-Build, Design-Build, \
         Integrated Project Delivery (IPD), Guaranteed Maximum Price (GMP), Joint Venture (JV), \
         Public Private Partnership (P3), Other)\n\
         - Estimated Program Area\n\
         - Estimated Budget\n\
         - Sustainability Requirement\n\
         - BIM Requirements\n\n\
         Additional Information Aligned with Core Values:\n\
         - Design Excellence Opportunities\n\
         - Sustainability Initiatives\n\
         - Resilience Measures\n\
         - Innovation Potential\n\
         - Diversity and Inclusion Aspects\n\
         - Social Purpose Contributions\n\
         - Well-Being Factors\n\
         - Technological Innovation Opportunities\n\n\
         If the information is not found, respond with '{NOT_FOUND_FALLBACK}'\n\n\
         RFP Document Text:\n{document_text}"
    )
}

/// Answers a single ad-hoc question grounded in the document text.
pub fn free_form_query(document_text: &str, question: &str) -> String {
    format!(
        "Based on the provided document, answer the following question: '{question}'. \
         Provide a concise and accurate response. \
         If the information is not explicitly mentioned, provide relevant context or \
         suggest an appropriate next step.\n\n\
         Document Text:\n{document_text}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "Issue Date: Jan 1. Scope: new construction. Budget: $1M.";

    #[test]
    fn templates_embed_the_document_text_verbatim() {
        assert!(executive_summary(DOC).contains(DOC));
        assert!(pipeline_data(DOC).contains(DOC));
        assert!(free_form_query(DOC, "When is it due?").contains(DOC));
    }

    #[test]
    fn pipeline_data_carries_the_fallback_sentence() {
        assert!(pipeline_data(DOC).contains(NOT_FOUND_FALLBACK));
    }

    #[test]
    fn free_form_query_embeds_the_question() {
        let prompt = free_form_query(DOC, "What is the budget?");
        assert!(prompt.contains("'What is the budget?'"));
    }

    #[test]
    fn templates_are_deterministic() {
        assert_eq!(pipeline_data(DOC), pipeline_data(DOC));
        assert_eq!(executive_summary(DOC), executive_summary(DOC));
    }

    #[test]
    fn action_labels_match_the_ui_buttons() {
        assert_eq!(
            PromptAction::ExecutiveSummary.label(),
            "Generate Executive Summary"
        );
        assert_eq!(PromptAction::PipelineData.label(), "Generate Pipeline Data");
    }

    #[test]
    fn actions_deserialize_from_snake_case() {
        let action: PromptAction = serde_json::from_str("\"pipeline_data\"").unwrap();
        assert_eq!(action, PromptAction::PipelineData);
    }
}

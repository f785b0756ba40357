//! Document validation gate

use crate::schemas::{Document, DocumentStatus, DocumentType, Procedure};

use super::transitions::TransitionResult;

/// Documents every new permit application must carry
pub const REQUIRED_APPLICATION_DOCUMENTS: &[DocumentType] = &[
    DocumentType::TradeRegister,
    DocumentType::Statutes,
    DocumentType::TechnicalNote,
    DocumentType::CadastralMap,
];

/// Review one document of `procedure`: `en_attente` to `valide` or `rejete`, once.
pub fn review_document(
    procedure: &Procedure,
    document_id: &str,
    status: DocumentStatus,
    comment: Option<String>,
) -> TransitionResult {
    if !status.is_terminal() {
        return TransitionResult::Error {
            error: "a review must mark the document valide or rejete".to_string(),
        };
    }

    let document = match procedure.document(document_id) {
        Some(document) => document,
        None => {
            return TransitionResult::Error {
                error: format!("procedure {} has no document {}", procedure.code, document_id),
            }
        }
    };

    if document.status.is_terminal() {
        return TransitionResult::Error {
            error: format!("document {} was already reviewed ({})", document.name, document.status),
        };
    }

    let comment = comment.filter(|c| !c.trim().is_empty());
    let reviewed = document.clone().reviewed(status, comment);
    TransitionResult::Success {
        next_procedure: procedure.clone().with_document(reviewed),
    }
}

/// Review counts over a set of documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentTally {
    pub pending: usize,
    pub valid: usize,
    pub rejected: usize,
}

impl DocumentTally {
    pub fn total(&self) -> usize {
        self.pending + self.valid + self.rejected
    }
}

pub fn tally<'a>(documents: impl IntoIterator<Item = &'a Document>) -> DocumentTally {
    documents
        .into_iter()
        .fold(DocumentTally::default(), |mut t, d| {
            match d.status {
                DocumentStatus::Pending => t.pending += 1,
                DocumentStatus::Valid => t.valid += 1,
                DocumentStatus::Rejected => t.rejected += 1,
            }
            t
        })
}

/// Required document types absent from `documents`
pub fn missing_documents<'a>(
    documents: impl IntoIterator<Item = &'a DocumentType>,
    required: &[DocumentType],
) -> Vec<DocumentType> {
    let present: Vec<&DocumentType> = documents.into_iter().collect();
    required
        .iter()
        .filter(|t| !present.contains(t))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{date, utc_day, ProcedureType};

    fn doc(id: &str, status: DocumentStatus) -> Document {
        Document::new(
            id.to_string(),
            "1".to_string(),
            DocumentType::Statutes,
            format!("doc_{}.pdf", id),
            format!("/documents/doc_{}.pdf", id),
            utc_day(2025, 1, 10),
        )
        .reviewed(status, None)
    }

    fn make_procedure() -> Procedure {
        Procedure::new(
            "1".to_string(),
            "PR-2025-017".to_string(),
            ProcedureType::Substitution,
            "1".to_string(),
            date(2025, 1, 10),
        )
        .with_document(doc("1", DocumentStatus::Valid))
        .with_document(doc("2", DocumentStatus::Pending))
    }

    #[test]
    fn test_review_pending_document() {
        let p = make_procedure();
        let next = review_document(&p, "2", DocumentStatus::Rejected, Some("Illisible".to_string()))
            .procedure()
            .unwrap();

        let reviewed = next.document("2").unwrap();
        assert_eq!(reviewed.status, DocumentStatus::Rejected);
        assert_eq!(reviewed.comment.as_deref(), Some("Illisible"));
        assert_eq!(p.document("2").unwrap().status, DocumentStatus::Pending);
    }

    #[test]
    fn test_no_re_review() {
        let result = review_document(&make_procedure(), "1", DocumentStatus::Rejected, None);
        assert!(result.is_error());
        assert!(result.error().unwrap().contains("already reviewed"));
    }

    #[test]
    fn test_review_requires_terminal_outcome() {
        let result = review_document(&make_procedure(), "2", DocumentStatus::Pending, None);
        assert!(result.is_error());
    }

    #[test]
    fn test_review_unknown_document() {
        assert!(review_document(&make_procedure(), "9", DocumentStatus::Valid, None).is_error());
    }

    #[test]
    fn test_tally_sums_to_total() {
        let docs = vec![
            doc("1", DocumentStatus::Valid),
            doc("2", DocumentStatus::Pending),
            doc("3", DocumentStatus::Pending),
            doc("4", DocumentStatus::Rejected),
        ];
        let t = tally(&docs);
        assert_eq!(t, DocumentTally { pending: 2, valid: 1, rejected: 1 });
        assert_eq!(t.total(), docs.len());
        assert_eq!(tally(std::iter::empty()).total(), 0);
    }

    #[test]
    fn test_missing_documents() {
        let present = [DocumentType::Statutes, DocumentType::TradeRegister];
        let missing = missing_documents(&present, REQUIRED_APPLICATION_DOCUMENTS);
        assert_eq!(missing, vec![DocumentType::TechnicalNote, DocumentType::CadastralMap]);
        assert!(missing_documents(REQUIRED_APPLICATION_DOCUMENTS, REQUIRED_APPLICATION_DOCUMENTS).is_empty());
    }
}

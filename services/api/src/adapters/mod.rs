pub mod assistant_llm;
pub mod document_store;
pub mod pdf;

pub use assistant_llm::OpenAiAssistantAdapter;
pub use document_store::PgDocumentStore;
pub use pdf::extract_pdf_text;

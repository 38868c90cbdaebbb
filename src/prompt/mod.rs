//! Prompt assembly: template catalog and persona inference.

pub mod persona;
pub mod template;

pub use persona::developer_persona;
pub use template::PromptTemplate;

//! 数据模型
//!
//! 与远程服务交互的所有 DTO，以及审计记录、批量/多国家处理结果等内部模型。

pub mod audit;
pub mod country;
pub mod pipeline;
pub mod validation;

pub use audit::{AuditRecord, AuditStatus, ProcessingType};
pub use country::country_name;
pub use pipeline::{
    ImageFile, LabelData, OcrResult, PipelineResult, ProcessingRequest, ProcessingTime,
    StructureResult, TranslatedData,
};
pub use validation::{Finding, Severity, ValidationResult};

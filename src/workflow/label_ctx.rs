//! 标签处理上下文
//!
//! 封装"谁在处理哪个文件、目标哪个国家"这一信息

use std::fmt::Display;

use crate::models::country;

/// 标签处理上下文
#[derive(Debug, Clone)]
pub struct LabelCtx {
    /// 发起处理的用户名
    pub username: String,

    /// 原始文件名
    pub file_name: String,

    /// 目标国家代码（已统一为大写）
    pub country: String,

    /// 批量处理中的序号（从 1 开始；单文件调用为 0，仅用于日志显示）
    pub item_index: usize,
}

impl LabelCtx {
    /// 创建新的处理上下文
    pub fn new(username: &str, file_name: &str, country: &str) -> Self {
        Self {
            username: username.to_string(),
            file_name: file_name.to_string(),
            country: country.to_string(),
            item_index: 0,
        }
    }

    /// 附加批量序号
    pub fn with_index(mut self, item_index: usize) -> Self {
        self.item_index = item_index;
        self
    }
}

impl Display for LabelCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.item_index > 0 {
            write!(
                f,
                "[文件 {}] {} → {}",
                self.item_index,
                self.file_name,
                country::country_label(&self.country)
            )
        } else {
            write!(
                f,
                "{} → {}",
                self.file_name,
                country::country_label(&self.country)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_single() {
        let ctx = LabelCtx::new("alice", "label.png", "USA");
        assert_eq!(ctx.to_string(), "label.png → 美国 (USA)");
    }

    #[test]
    fn test_display_with_index() {
        let ctx = LabelCtx::new("alice", "label.png", "ZZZ").with_index(3);
        assert_eq!(ctx.to_string(), "[文件 3] label.png → ZZZ");
    }
}

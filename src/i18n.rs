// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认）和中文
// ==========================================
// 注意:
// - rust_i18n::i18n! 宏已在 lib.rs 中初始化
// - 分析调用一律显式传入 locale,不读写全局语言状态
// ==========================================

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use capacity_planner::i18n::t_in;
/// let msg = t_in("en", "analysis.orders_skipped");
/// ```
pub fn t_in(locale: &str, key: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 翻译消息（带参数）
///
/// 占位符格式: `%{name}`
///
/// # 示例
/// ```no_run
/// use capacity_planner::i18n::t_with_args;
/// let msg = t_with_args("en", "analysis.orders_skipped", &[("count", "3")]);
/// ```
pub fn t_with_args(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    let mut result = t_in(locale, key);
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

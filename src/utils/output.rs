//! # 美化输出工具
//!
//! 提供统一的终端状态行：`[OK]`, `[ERR]`, `[WARN]`, `[*]`, `[SKIP]`，
//! 以及标题栏、分隔线和空数据提示。
//!
//! ## 依赖关系
//! - 被所有 `commands/` 模块和 `main.rs` 使用
//! - 使用 `colored` crate

use colored::Colorize;

/// 标题栏与分隔线宽度
const RULE_WIDTH: usize = 64;

pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 错误写到 stderr
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

pub fn print_skip(msg: &str) {
    println!("{} {}", "[SKIP]".dimmed(), msg);
}

/// 打印导出/渲染结果：`[OK] kind -> path`
pub fn print_saved(kind: &str, path: &str) {
    println!(
        "{} {} {} {}",
        "[OK]".green().bold(),
        kind.dimmed(),
        "->".cyan(),
        path
    );
}

/// 打印空数据状态（不是错误，命令继续以成功退出）
pub fn print_empty_state(msg: &str) {
    println!("{} {}", "[EMPTY]".magenta().bold(), msg.italic());
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(RULE_WIDTH);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// 打印分隔线
pub fn print_separator() {
    println!("{}", "─".repeat(RULE_WIDTH).dimmed());
}

//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 fx-runtime 覆盖率
//! - `path-check`: 检查路径形变样例（解析、对齐不变量）

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use clap::{Parser, Subcommand};
use fx_runtime::path::{MorphHints, PathData, align};
use serde::Deserialize;
use tracing::Level;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "开发辅助工具")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行 fmt、clippy、test 门禁检查
    CheckAll,

    /// 运行 fx-runtime 覆盖率报告
    CovRuntime,

    /// 检查路径形变样例
    ///
    /// 不带参数时检查 fixtures/paths/ 下所有 .json 文件。
    PathCheck {
        /// 样例文件或目录
        path: Option<PathBuf>,
    },
}

fn run(step: &str, cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("\n==> {step}");
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{step} failed with {status}");
    }
    Ok(())
}

fn ensure_cargo_llvm_cov_available() -> anyhow::Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["llvm-cov", "--version"]);
    match cmd.status() {
        Ok(s) if s.success() => Ok(()),
        _ => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    if let Err(e) = real_main(cli.command) {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::CheckAll => {
            let mut fmt = Command::new("cargo");
            fmt.args(["fmt", "--all", "--", "--check"]);
            run("cargo fmt --all -- --check", &mut fmt)?;

            let mut clippy = Command::new("cargo");
            clippy.args(["clippy", "--workspace", "--all-targets"]);
            run("cargo clippy --workspace --all-targets", &mut clippy)?;

            let mut test = Command::new("cargo");
            test.args(["test", "--workspace"]);
            run("cargo test --workspace", &mut test)?;
        }
        Commands::CovRuntime => {
            ensure_cargo_llvm_cov_available()?;

            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "-p", "fx-runtime", "--html"]);
            run("cargo llvm-cov -p fx-runtime --html", &mut cov)?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        Commands::PathCheck { path } => path_check(path.as_deref())?,
    }

    Ok(())
}

//=============================================================================
// path-check 命令实现
//=============================================================================

/// 默认样例目录（相对于 workspace root）
const DEFAULT_FIXTURES_DIR: &str = "fixtures/paths";

/// 形变样例
#[derive(Debug, Deserialize)]
struct MorphFixture {
    /// 起始路径
    from: String,
    /// 目标路径
    to: String,
    /// 形变提示
    #[serde(default)]
    hints: MorphHints,
}

/// 检查结果
#[derive(Debug, Default)]
struct PathCheckResult {
    checked: usize,
    errors: Vec<String>,
}

/// 执行路径样例检查
fn path_check(path: Option<&Path>) -> anyhow::Result<()> {
    let files = match path {
        Some(p) if p.is_file() => vec![p.to_path_buf()],
        Some(p) if p.is_dir() => collect_fixture_files(p),
        Some(p) => anyhow::bail!("路径不存在: {}", p.display()),
        None => {
            let dir = Path::new(DEFAULT_FIXTURES_DIR);
            if !dir.exists() {
                anyhow::bail!(
                    "默认样例目录不存在: {}\n请在 workspace 根目录运行，或指定样例路径",
                    dir.display()
                );
            }
            collect_fixture_files(dir)
        }
    };

    if files.is_empty() {
        eprintln!("未找到样例文件（.json）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个路径样例...\n", files.len());

    let mut result = PathCheckResult::default();
    for file in &files {
        result.checked += 1;
        if let Err(e) = check_fixture(file) {
            result.errors.push(format!("{}: {e:#}", file.display()));
        }
    }

    print_check_result(&result);

    if !result.errors.is_empty() {
        anyhow::bail!("路径样例检查发现错误");
    }
    Ok(())
}

/// 收集目录下的所有样例文件
fn collect_fixture_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

/// 检查单个样例：两条路径都能解析，对齐结果等长且命令位置一致
fn check_fixture(file: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file)?;
    let fixture: MorphFixture = serde_json::from_str(&content)?;

    let from = PathData::parse(&fixture.from)?;
    let to = PathData::parse(&fixture.to)?;
    let aligned = align(&from, &to, &fixture.hints);

    if aligned.start.len() != aligned.end.len() {
        anyhow::bail!(
            "对齐后长度不一致: {} / {}",
            aligned.start.len(),
            aligned.end.len()
        );
    }

    let mismatch = aligned
        .start
        .tokens()
        .iter()
        .zip(aligned.end.tokens())
        .position(|(a, b)| a.is_command() != b.is_command());
    if let Some(index) = mismatch {
        anyhow::bail!("第 {index} 个 token 的命令位置不一致");
    }

    eprintln!(
        "[OK] {}: {} -> {} tokens",
        file.display(),
        from.len(),
        aligned.end.len()
    );
    Ok(())
}

/// 输出检查结果
fn print_check_result(result: &PathCheckResult) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 个样例", result.checked);
    eprintln!();

    for error in &result.errors {
        eprintln!("[ERROR] {error}");
    }

    eprintln!();
    if result.errors.is_empty() {
        eprintln!("✅ 检查通过，无错误");
    } else {
        eprintln!("❌ {} 个错误", result.errors.len());
    }
}

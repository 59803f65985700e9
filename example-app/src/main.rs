//! # 示例应用程序
//!
//! 从组件目录执行一次 Servlet 组件注册，并输出注册表内容

use anyhow::Context;
use clap::Parser;
use di_abstractions::RegistryView;
use di_impl::DefaultComponentRegistry;
use infrastructure_common::ComponentDescriptor;
use infrastructure_composition::{
    config_sources, ApplicationContext, BootstrapReport, ScanDeclaration,
    ServletApplicationBootstrapper,
};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Servlet 组件注册示例应用")]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = "config/app.toml")]
    config: String,

    /// 组件目录文件路径，覆盖配置中的设置
    #[arg(long)]
    catalog: Option<String>,

    /// 发出扫描声明的类型
    #[arg(long, default_value = "com::wk::config::ServletConfig")]
    declaring_type: String,

    /// 扫描根路径，可重复指定
    #[arg(short, long = "base-package")]
    base_packages: Vec<String>,

    /// 模拟已绑定服务端口的上下文
    #[arg(long)]
    serving: bool,

    /// 以 JSON 格式输出
    #[arg(long)]
    json: bool,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    info!("启动 Servlet 组件注册示例应用");

    let config_path = Path::new(&args.config);
    let mut settings = if config_path.exists() {
        config_sources::load_settings(Some(config_path))
            .with_context(|| format!("加载配置文件失败: {}", args.config))?
    } else {
        info!("配置文件不存在，将使用默认配置和环境变量");
        config_sources::load_settings(None).context("加载配置失败")?
    };
    if let Some(catalog) = &args.catalog {
        settings.scan.catalog = Some(catalog.clone());
    }

    let mut declaration = ScanDeclaration::new(&args.declaring_type);
    for package in &args.base_packages {
        declaration = declaration.with_base_package(package);
    }

    if settings.scan.catalog.is_none() {
        warn!("未指定组件目录, 扫描不会发现任何组件");
    }

    let bootstrapper = ServletApplicationBootstrapper::new()
        .with_environment(ApplicationContext::Web {
            serving: args.serving,
        })
        .declare_scan(declaration);

    let mut registry = DefaultComponentRegistry::new();
    let report = bootstrapper
        .with_settings(settings)
        .bootstrap(&mut registry)
        .context("组件注册失败")?;

    if args.json {
        print_json(&registry, &report)?;
    } else {
        print_summary(&registry, &report);
    }

    info!("应用已完成, 共 {} 个组件", registry.len());
    Ok(())
}

fn print_json(registry: &DefaultComponentRegistry, report: &BootstrapReport) -> anyhow::Result<()> {
    let components: Vec<&ComponentDescriptor> = registry.descriptors().collect();
    let output = serde_json::json!({
        "components": components,
        "report": report,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_summary(registry: &DefaultComponentRegistry, report: &BootstrapReport) {
    println!("注册表:");
    for descriptor in registry.descriptors() {
        println!(
            "  {} ({}, {:?})",
            descriptor.name, descriptor.type_tag, descriptor.role
        );
    }

    if let Some(scan) = &report.scan {
        match scan.skipped {
            Some(reason) => println!("组件扫描: 已跳过 ({})", reason),
            None => println!(
                "组件扫描: 根路径 {:?}, 候选组件 {} 个, 注册 {} 个",
                scan.roots,
                scan.candidates,
                scan.registered.len()
            ),
        }
    }

    println!("条件评估:");
    for evaluation in &report.evaluations {
        let state = if evaluation.matched { "匹配" } else { "不匹配" };
        println!("  {} {}: {}", evaluation.id, state, evaluation.reason_trail.join("; "));
    }
}

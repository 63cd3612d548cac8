// ==========================================
// 车行后台管理系统 - 命令行入口
// ==========================================
// 用途: 库模式验证入口（UI 外壳不在本仓库范围内）
// 用法: moto-dealer-import <租户> <bike|part|transaction> <文件> [--submit]
// ==========================================

use moto_dealer_import::api::ImportApi;
use moto_dealer_import::db::get_default_db_path;
use moto_dealer_import::domain::{RecordKind, RequestContext, TenantId};
use moto_dealer_import::logging;

#[tokio::main]
async fn main() {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", moto_dealer_import::APP_NAME);
    tracing::info!("系统版本: {}", moto_dealer_import::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        eprintln!("用法: moto-dealer-import <租户> <bike|part|transaction> <文件> [--submit]");
        std::process::exit(2);
    }

    let tenant = match TenantId::new(args[0].as_str()) {
        Some(t) => t,
        None => {
            eprintln!("租户标识不能为空");
            std::process::exit(2);
        }
    };

    let kind = match RecordKind::from_str(&args[1]) {
        Some(k) => k,
        None => {
            eprintln!("未知实体类型: {}（应为 bike/part/transaction）", args[1]);
            std::process::exit(2);
        }
    };

    let file_path = args[2].clone();
    let submit = args.iter().any(|a| a == "--submit");

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let ctx = RequestContext::new(tenant, whoami());
    let import_api = ImportApi::new(db_path);

    // 解析 + 校验
    let parsed = match import_api.parse_file(&ctx, &file_path, kind).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("解析失败: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "解析完成: 共 {} 行，错误 {} 行，警告 {} 行",
        parsed.total_rows, parsed.error_rows, parsed.warning_rows
    );

    for record in &parsed.batch.records {
        for error in &record.errors {
            println!("  行 {}: [错误] {}", record.row_number, error);
        }
        for warning in &record.warnings {
            println!("  行 {}: [警告] {}", record.row_number, warning);
        }
    }

    if !submit {
        println!("（未带 --submit，仅做解析与校验）");
        return;
    }

    let mut batch = parsed.batch;
    match import_api.submit_batch(&ctx, &mut batch).await {
        Ok(result) => {
            println!(
                "{}: 成功 {} / 失败 {} / 警告 {}",
                result.message, result.success, result.errors, result.warnings
            );
            if !result.all_succeeded {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("提交失败: {}", e);
            std::process::exit(1);
        }
    }
}

/// 操作人标识：环境变量 USER/USERNAME，取不到时用固定值
fn whoami() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "system".to_string())
}

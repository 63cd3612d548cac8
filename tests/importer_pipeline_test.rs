// ==========================================
// 导入管道集成测试
// ==========================================
// 测试目标: 文件 → 原始行 → 记录 → 校验 的完整链路
// ==========================================

mod test_helpers;

use moto_dealer_import::api::{ApiError, ImportApi};
use moto_dealer_import::domain::RecordKind;
use moto_dealer_import::logging;
use test_helpers::{create_test_db, fixture_path, test_ctx};

#[tokio::test]
async fn test_csv_to_validated_bike_record() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db();
    let ctx = test_ctx("shop-a");
    let api = ImportApi::new(db_path);

    let result = api
        .parse_file(&ctx, &fixture_path("bikes.csv"), RecordKind::Bike)
        .await
        .expect("parse should succeed");

    assert_eq!(result.total_rows, 1);
    assert_eq!(result.error_rows, 0);
    assert_eq!(result.warning_rows, 0);

    let record = &result.batch.records[0];
    assert_eq!(record.brand, "Honda");
    assert_eq!(record.model, "CBR600RR");
    assert_eq!(record.year, Some(2023));
    assert_eq!(record.price, Some(12500.0));
    // 名称由 年+品牌+型号 派生
    assert_eq!(record.name, "2023 Honda CBR600RR");
    assert!(record.errors.is_empty());
}

#[tokio::test]
async fn test_csv_parts_with_quoted_comma_gap() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db();
    let ctx = test_ctx("shop-a");
    let api = ImportApi::new(db_path);

    let result = api
        .parse_file(&ctx, &fixture_path("parts.csv"), RecordKind::Part)
        .await
        .expect("parse should succeed");

    assert_eq!(result.total_rows, 2);

    // 第一行完整
    let first = &result.batch.records[0];
    assert_eq!(first.name, "机油滤芯");
    assert_eq!(first.part_number, "HF-204");
    assert_eq!(first.price, Some(45.0));
    assert_eq!(first.stock_qty, Some(30));
    assert!(first.errors.is_empty());

    // 第二行的售价写成 "1,280"：引号内逗号按字面切分（已知限制），
    // 售价解析不出来 → 必填金额错误
    let second = &result.batch.records[1];
    assert_eq!(second.price, None);
    assert!(second.errors.iter().any(|e| e.contains("售价")));
    assert_eq!(result.error_rows, 1);
}

#[tokio::test]
async fn test_unsupported_extension_fails_immediately() {
    let (_temp_file, db_path) = create_test_db();
    let ctx = test_ctx("shop-a");
    let api = ImportApi::new(db_path);

    let result = api
        .parse_file(&ctx, "upload/inventory.docx", RecordKind::Bike)
        .await;

    match result {
        Err(ApiError::ImportError(msg)) => assert!(msg.contains("docx")),
        other => panic!("expected ImportError, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_pdf_is_explicit_stub_via_api() {
    let (_temp_file, db_path) = create_test_db();
    let ctx = test_ctx("shop-a");
    let api = ImportApi::new(db_path);

    // 构造一个真实存在的 .pdf 文件
    let pdf = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    std::fs::write(pdf.path(), b"%PDF-1.4").unwrap();

    let result = api
        .parse_file(&ctx, &pdf.path().display().to_string(), RecordKind::Bike)
        .await;

    match result {
        Err(ApiError::ImportError(msg)) => assert!(msg.contains("PDF")),
        other => panic!("expected ImportError, got {:?}", other.map(|_| ())),
    }
}

// popup 视图与导出的组合行为测试：
// 分页游标、删除/清空复位、导出计数与变换联动

use chrono::Utc;

use cloudinary_uploader::db::UploadRecord;
use cloudinary_uploader::export::build_export;
use cloudinary_uploader::transform::TransformConfig;
use cloudinary_uploader::view::HistoryView;

fn records(n: usize) -> Vec<UploadRecord> {
    (0..n)
        .map(|i| UploadRecord {
            id: format!("upload-{i}"),
            url: format!("https://res.cloudinary.com/demo/image/upload/{i}.png"),
            timestamp: 1_700_000_000_000 + (n - i) as i64,
        })
        .collect()
}

#[test]
fn load_more_walks_pages_and_delete_resets() {
    let mut all = records(25);
    let config = TransformConfig::default();
    let mut view = HistoryView::default();

    let first = view.render(&all, &config);
    assert_eq!(
        (first.items.len(), first.remaining, first.total),
        (10, 15, 25)
    );

    view.load_more();
    let second = view.render(&all, &config);
    assert_eq!((second.items.len(), second.remaining), (20, 5));

    // 删除一条后：权威数据重新读出，游标复位到第一页
    all.remove(0);
    view.reset();
    let after_delete = view.render(&all, &config);
    assert_eq!(
        (after_delete.items.len(), after_delete.remaining, after_delete.total),
        (10, 14, 24)
    );

    // 清空后：空列表 + 无剩余
    view.reset();
    let cleared = view.render(&[], &config);
    assert_eq!((cleared.items.len(), cleared.remaining, cleared.total), (0, 0, 0));
}

#[test]
fn export_counts_full_history_regardless_of_pagination() {
    let all = records(25);
    let config = TransformConfig {
        enabled: true,
        width: Some(128),
        ..Default::default()
    };

    // 视图只展示第一页
    let rendered = HistoryView::default().render(&all, &config);
    assert_eq!(rendered.items.len(), 10);

    // 导出始终覆盖全量
    let document = build_export(&all, &config, Utc::now());
    assert_eq!(document.count, 25);
    assert_eq!(document.uploads.len(), 25);
    assert!(document
        .uploads
        .iter()
        .all(|u| u.transformed_url.contains("/upload/w_128/")));
}

#[test]
fn view_and_export_share_the_same_transform() {
    let all = records(1);
    let config = TransformConfig {
        enabled: true,
        format: Some("webp".to_string()),
        ..Default::default()
    };

    let rendered = HistoryView::default().render(&all, &config);
    let document = build_export(&all, &config, Utc::now());

    assert_eq!(
        rendered.items[0].transformed_url,
        document.uploads[0].transformed_url
    );
    assert!(rendered.items[0].transformed_url.ends_with("0.webp"));
}

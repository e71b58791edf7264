// 变换函数的端到端 URL 用例表

use cloudinary_uploader::transform::{transform, TransformConfig};

fn config(
    width: Option<u32>,
    height: Option<u32>,
    quality: Option<&str>,
    format: Option<&str>,
    crop: Option<&str>,
) -> TransformConfig {
    TransformConfig {
        enabled: true,
        width,
        height,
        quality: quality.map(str::to_string),
        format: format.map(str::to_string),
        crop: crop.map(str::to_string),
    }
}

#[test]
fn url_cases() {
    let cases: &[(&str, TransformConfig, &str)] = &[
        // 宽高插入
        (
            "https://res.cloudinary.com/demo/image/upload/sample.jpg",
            config(Some(200), Some(100), None, None, None),
            "https://res.cloudinary.com/demo/image/upload/w_200,h_100/sample.jpg",
        ),
        // 全字段固定顺序
        (
            "https://res.cloudinary.com/demo/image/upload/v1/folder/sample.jpg",
            config(Some(300), Some(200), Some("80"), Some("auto"), Some("fill")),
            "https://res.cloudinary.com/demo/image/upload/w_300,h_200,c_fill,q_80,f_auto/v1/folder/sample.jpg",
        ),
        // format 换扩展名
        (
            "https://res.cloudinary.com/demo/image/upload/sample.jpg",
            config(None, None, None, Some("webp"), None),
            "https://res.cloudinary.com/demo/image/upload/f_webp/sample.webp",
        ),
        // 深路径时只替换末段扩展名
        (
            "https://res.cloudinary.com/demo/image/upload/v99/dir/photo.png",
            config(Some(50), None, None, Some("avif"), None),
            "https://res.cloudinary.com/demo/image/upload/w_50,f_avif/v99/dir/photo.avif",
        ),
        // 非 cloudinary 域名不动
        (
            "https://example.com/a/b.png",
            config(Some(100), None, None, None, None),
            "https://example.com/a/b.png",
        ),
        // 路径里没有 upload 段不动
        (
            "https://res.cloudinary.com/demo/image/fetch/sample.jpg",
            config(Some(100), None, None, None, None),
            "https://res.cloudinary.com/demo/image/fetch/sample.jpg",
        ),
        // 没有任何指令字段不动
        (
            "https://res.cloudinary.com/demo/image/upload/sample.jpg",
            config(None, None, None, None, None),
            "https://res.cloudinary.com/demo/image/upload/sample.jpg",
        ),
    ];

    for (input, cfg, expected) in cases {
        assert_eq!(transform(input, cfg), *expected, "input: {input}");
    }
}

#[test]
fn disabled_config_never_rewrites() {
    let cfg = TransformConfig {
        enabled: false,
        width: Some(999),
        format: Some("webp".to_string()),
        ..Default::default()
    };
    let url = "https://res.cloudinary.com/demo/image/upload/sample.jpg";
    assert_eq!(transform(url, &cfg), url);
}

#[test]
fn rewriting_is_single_shot_by_contract() {
    // 对已变换的 URL 再次调用会产生第二个指令段：
    // 调用方约定永远以原始 URL 为输入，这里固化该（非幂等）行为。
    let cfg = config(Some(200), None, None, None, None);
    let once = transform(
        "https://res.cloudinary.com/demo/image/upload/sample.jpg",
        &cfg,
    );
    let twice = transform(&once, &cfg);
    assert_eq!(
        twice,
        "https://res.cloudinary.com/demo/image/upload/w_200/w_200/sample.jpg"
    );
}

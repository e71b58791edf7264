//! 上传历史子模块
//!
//! ## 职责
//! - 追加记录（生成唯一 id + 毫秒时间戳，随后裁剪到容量上限）
//! - 按插入顺序（最新在前）读取全量列表
//! - 按 id 删除（不存在时为 no-op）与整表清空
//!
//! ## 约束
//! - 排序只依赖 `seq`，不依赖 `timestamp`：时钟回拨不影响插入顺序。
//! - 裁剪从尾部（最老的插入）开始，保留最近 `limit` 条。

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::error::AppError;

use super::UploadRecord;

/// 生成形如 `upload-<毫秒>-<随机后缀>` 的记录 id。
///
/// 同一毫秒内的多次生成依赖 UUID 随机后缀保证不碰撞，
/// 数据库 UNIQUE 约束再兜底一层。
fn new_record_id(timestamp: i64) -> String {
    format!("upload-{}-{}", timestamp, Uuid::new_v4().simple())
}

fn prune_to_limit(conn: &Connection, limit: u32) -> Result<(), AppError> {
    conn.execute(
        "DELETE FROM uploads WHERE seq NOT IN (
            SELECT seq FROM uploads ORDER BY seq DESC LIMIT ?1
        )",
        params![i64::from(limit)],
    )
    .map_err(|e| AppError::Database(format!("裁剪历史容量失败: {}", e)))?;
    Ok(())
}

/// 追加一条上传记录并裁剪到容量上限，返回新建的记录。
pub(crate) fn append_upload(
    conn: &Connection,
    url: &str,
    limit: u32,
) -> Result<UploadRecord, AppError> {
    let timestamp = chrono::Utc::now().timestamp_millis();
    let record = UploadRecord {
        id: new_record_id(timestamp),
        url: url.to_string(),
        timestamp,
    };

    conn.execute(
        "INSERT INTO uploads (id, url, timestamp) VALUES (?1, ?2, ?3)",
        params![record.id, record.url, record.timestamp],
    )
    .map_err(|e| AppError::Database(format!("插入上传记录失败: {}", e)))?;

    prune_to_limit(conn, limit)?;

    Ok(record)
}

/// 全量读取，最新插入在前。
pub(crate) fn list_uploads(conn: &Connection) -> Result<Vec<UploadRecord>, AppError> {
    let mut stmt = conn
        .prepare("SELECT id, url, timestamp FROM uploads ORDER BY seq DESC")
        .map_err(|e| AppError::Database(format!("准备历史查询失败: {}", e)))?;

    let records = stmt
        .query_map([], |row| {
            Ok(UploadRecord {
                id: row.get(0)?,
                url: row.get(1)?,
                timestamp: row.get(2)?,
            })
        })
        .map_err(|e| AppError::Database(format!("查询历史失败: {}", e)))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Database(format!("读取行失败: {}", e)))?;

    Ok(records)
}

/// 按 id 删除，返回删除后的完整列表。id 不存在时列表原样返回。
pub(crate) fn delete_upload(conn: &Connection, id: &str) -> Result<Vec<UploadRecord>, AppError> {
    conn.execute("DELETE FROM uploads WHERE id = ?1", params![id])
        .map_err(|e| AppError::Database(format!("删除上传记录失败: {}", e)))?;
    list_uploads(conn)
}

/// 清空历史。
pub(crate) fn clear_uploads(conn: &Connection) -> Result<(), AppError> {
    conn.execute("DELETE FROM uploads", [])
        .map_err(|e| AppError::Database(format!("清空历史失败: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;
    use rusqlite::{params, Connection};

    use super::{append_upload, clear_uploads, delete_upload, list_uploads, new_record_id};

    fn setup_conn() -> Connection {
        let conn = Connection::open_in_memory().expect("create memory db");
        crate::db::schema::initialize_schema(&conn).expect("create schema");
        conn
    }

    #[test]
    fn append_returns_record_and_persists_it() {
        let conn = setup_conn();

        let record = append_upload(&conn, "https://res.cloudinary.com/demo/image/upload/a.png", 100)
            .expect("append");

        assert!(record.id.starts_with("upload-"));
        let listed = list_uploads(&conn).expect("list");
        assert_eq!(listed, vec![record]);
    }

    #[test]
    fn list_is_newest_insertion_first() {
        let conn = setup_conn();

        let a = append_upload(&conn, "https://x/a", 100).expect("append a");
        let b = append_upload(&conn, "https://x/b", 100).expect("append b");

        let listed = list_uploads(&conn).expect("list");
        assert_eq!(listed[0].id, b.id);
        assert_eq!(listed[1].id, a.id);
    }

    #[test]
    fn insertion_order_ignores_timestamps() {
        let conn = setup_conn();

        // 时间戳倒挂的两条记录：插入顺序仍然以 seq 为准
        conn.execute(
            "INSERT INTO uploads (id, url, timestamp) VALUES (?1, ?2, ?3)",
            params!["first", "https://x/1", 2000_i64],
        )
        .expect("insert first");
        conn.execute(
            "INSERT INTO uploads (id, url, timestamp) VALUES (?1, ?2, ?3)",
            params!["second", "https://x/2", 1000_i64],
        )
        .expect("insert second");

        let listed = list_uploads(&conn).expect("list");
        assert_eq!(listed[0].id, "second");
        assert_eq!(listed[1].id, "first");
    }

    #[test]
    fn append_beyond_limit_evicts_oldest() {
        let conn = setup_conn();

        for i in 0..15 {
            append_upload(&conn, &format!("https://x/{i}"), 10).expect("append");
        }

        let listed = list_uploads(&conn).expect("list");
        assert_eq!(listed.len(), 10);
        assert_eq!(listed[0].url, "https://x/14");
        assert_eq!(listed[9].url, "https://x/5");
    }

    #[test]
    fn delete_missing_id_is_noop() {
        let conn = setup_conn();

        let record = append_upload(&conn, "https://x/a", 100).expect("append");
        let after = delete_upload(&conn, "upload-0-missing").expect("delete missing");

        assert_eq!(after, vec![record]);
    }

    #[test]
    fn delete_existing_id_removes_only_that_record() {
        let conn = setup_conn();

        let a = append_upload(&conn, "https://x/a", 100).expect("append a");
        let b = append_upload(&conn, "https://x/b", 100).expect("append b");

        let after = delete_upload(&conn, &a.id).expect("delete a");
        assert_eq!(after, vec![b]);
    }

    #[test]
    fn clear_empties_the_table() {
        let conn = setup_conn();

        append_upload(&conn, "https://x/a", 100).expect("append");
        clear_uploads(&conn).expect("clear");

        assert!(list_uploads(&conn).expect("list").is_empty());
    }

    #[test]
    fn record_ids_do_not_collide_within_one_millisecond() {
        let ids: HashSet<String> = (0..1000).map(|_| new_record_id(12345)).collect();
        assert_eq!(ids.len(), 1000);
    }

    proptest! {
        /// 任意追加序列下：长度 == min(N, L)，且保留的恰是最近 L 条。
        #[test]
        fn prop_history_is_bounded_and_keeps_most_recent(n in 0usize..40, limit in 10u32..20) {
            let conn = setup_conn();
            for i in 0..n {
                append_upload(&conn, &format!("https://x/{i}"), limit).expect("append");
            }

            let listed = list_uploads(&conn).expect("list");
            prop_assert_eq!(listed.len(), n.min(limit as usize));
            for (offset, record) in listed.iter().enumerate() {
                let expected = format!("https://x/{}", n - 1 - offset);
                prop_assert_eq!(&record.url, &expected);
            }
        }
    }
}

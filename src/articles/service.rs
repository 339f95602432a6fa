//! # Articles Data Access
//!
//! Plain queries over `blogful_articles`. Each function takes an open
//! connection and returns rows or affected-row counts; store errors are
//! propagated untouched.

use diesel::prelude::*;
use diesel::SqliteConnection;

use super::model::{Article, ArticleChanges, NewArticle};
use crate::db::schema::blogful_articles;
use crate::db::StoreResult;

/// Every article, ordered by id.
pub fn get_all_articles(conn: &mut SqliteConnection) -> StoreResult<Vec<Article>> {
    let rows = blogful_articles::table
        .order(blogful_articles::id.asc())
        .select(Article::as_select())
        .load(conn)?;
    Ok(rows)
}

/// The article with `id`, or `None` when no row matches.
pub fn get_by_id(conn: &mut SqliteConnection, id: i32) -> StoreResult<Option<Article>> {
    let row = blogful_articles::table
        .find(id)
        .select(Article::as_select())
        .first(conn)
        .optional()?;
    Ok(row)
}

/// Insert a new article and return the stored row, generated fields included.
pub fn insert_article(conn: &mut SqliteConnection, article: &NewArticle) -> StoreResult<Article> {
    let row = diesel::insert_into(blogful_articles::table)
        .values(article)
        .returning(Article::as_returning())
        .get_result(conn)?;
    Ok(row)
}

/// Apply `changes` to the article with `id`. Returns the number of rows
/// updated, which is 0 when the id does not exist or nothing was supplied.
pub fn update_article(
    conn: &mut SqliteConnection,
    id: i32,
    changes: &ArticleChanges,
) -> StoreResult<usize> {
    if changes.is_empty() {
        return Ok(0);
    }

    let updated = diesel::update(blogful_articles::table.find(id))
        .set(changes)
        .execute(conn)?;
    Ok(updated)
}

/// Delete the article with `id`. Returns the number of rows removed.
pub fn delete_article(conn: &mut SqliteConnection, id: i32) -> StoreResult<usize> {
    let deleted = diesel::delete(blogful_articles::table.find(id)).execute(conn)?;
    Ok(deleted)
}

/// Remove every article and reset the id sequence.
pub fn truncate_articles(conn: &mut SqliteConnection) -> StoreResult<usize> {
    conn.transaction(|conn| {
        let deleted = diesel::delete(blogful_articles::table).execute(conn)?;
        diesel::sql_query("DELETE FROM sqlite_sequence WHERE name = 'blogful_articles'")
            .execute(conn)?;
        Ok(deleted)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, DbPool};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn setup() -> (TempDir, DbPool) {
        let tmp = TempDir::new().unwrap();
        let url = tmp.path().join("articles.db");
        let pool = create_pool(url.to_str().unwrap(), 1).unwrap();
        run_migrations(&pool).unwrap();
        (tmp, pool)
    }

    fn published_at() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2029, 1, 22)
            .unwrap()
            .and_hms_milli_opt(16, 28, 32, 615)
            .unwrap()
    }

    #[test]
    fn test_get_all_on_empty_table() {
        let (_tmp, pool) = setup();
        let mut conn = pool.get().unwrap();

        assert!(get_all_articles(&mut conn).unwrap().is_empty());
    }

    #[test]
    fn test_insert_assigns_id_and_default_date() {
        let (_tmp, pool) = setup();
        let mut conn = pool.get().unwrap();

        let first = insert_article(&mut conn, &NewArticle::new("One", "Body", "News")).unwrap();
        let second = insert_article(&mut conn, &NewArticle::new("Two", "Body", "News")).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.title, "One");
        assert_eq!(first.author, None);

        let now = chrono::Utc::now().naive_utc();
        assert!((now - first.date_published).num_seconds().abs() < 60);
    }

    #[test]
    fn test_insert_keeps_supplied_date_and_author() {
        let (_tmp, pool) = setup();
        let mut conn = pool.get().unwrap();

        let mut article = NewArticle::new("Dated", "Body", "Story");
        article.date_published = Some(published_at());
        article.author = Some(7);

        let stored = insert_article(&mut conn, &article).unwrap();
        assert_eq!(stored.date_published, published_at());
        assert_eq!(stored.author, Some(7));
    }

    #[test]
    fn test_get_by_id_found_and_absent() {
        let (_tmp, pool) = setup();
        let mut conn = pool.get().unwrap();

        let stored = insert_article(&mut conn, &NewArticle::new("One", "Body", "News")).unwrap();

        assert_eq!(get_by_id(&mut conn, stored.id).unwrap(), Some(stored));
        assert_eq!(get_by_id(&mut conn, 12345).unwrap(), None);
    }

    #[test]
    fn test_get_all_is_ordered_by_id() {
        let (_tmp, pool) = setup();
        let mut conn = pool.get().unwrap();

        for title in ["First", "Second", "Third"] {
            insert_article(&mut conn, &NewArticle::new(title, "Body", "News")).unwrap();
        }

        let ids: Vec<i32> = get_all_articles(&mut conn)
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_update_changes_only_supplied_fields() {
        let (_tmp, pool) = setup();
        let mut conn = pool.get().unwrap();

        let stored = insert_article(&mut conn, &NewArticle::new("One", "Body", "News")).unwrap();
        let changes = ArticleChanges {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };

        assert_eq!(update_article(&mut conn, stored.id, &changes).unwrap(), 1);

        let updated = get_by_id(&mut conn, stored.id).unwrap().unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.content, "Body");
        assert_eq!(updated.style, "News");
        assert_eq!(updated.date_published, stored.date_published);
    }

    #[test]
    fn test_update_missing_id_affects_nothing() {
        let (_tmp, pool) = setup();
        let mut conn = pool.get().unwrap();

        let changes = ArticleChanges {
            style: Some("Listicle".to_string()),
            ..Default::default()
        };
        assert_eq!(update_article(&mut conn, 99, &changes).unwrap(), 0);
    }

    #[test]
    fn test_update_with_no_changes_is_a_noop() {
        let (_tmp, pool) = setup();
        let mut conn = pool.get().unwrap();

        let stored = insert_article(&mut conn, &NewArticle::new("One", "Body", "News")).unwrap();
        assert_eq!(
            update_article(&mut conn, stored.id, &ArticleChanges::default()).unwrap(),
            0
        );
    }

    #[test]
    fn test_delete_removes_row() {
        let (_tmp, pool) = setup();
        let mut conn = pool.get().unwrap();

        let stored = insert_article(&mut conn, &NewArticle::new("One", "Body", "News")).unwrap();

        assert_eq!(delete_article(&mut conn, stored.id).unwrap(), 1);
        assert_eq!(get_by_id(&mut conn, stored.id).unwrap(), None);
        assert_eq!(delete_article(&mut conn, stored.id).unwrap(), 0);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let (_tmp, pool) = setup();
        let mut conn = pool.get().unwrap();

        let first = insert_article(&mut conn, &NewArticle::new("One", "Body", "News")).unwrap();
        delete_article(&mut conn, first.id).unwrap();
        let second = insert_article(&mut conn, &NewArticle::new("Two", "Body", "News")).unwrap();

        assert!(second.id > first.id);
    }

    #[test]
    fn test_truncate_resets_sequence() {
        let (_tmp, pool) = setup();
        let mut conn = pool.get().unwrap();

        insert_article(&mut conn, &NewArticle::new("One", "Body", "News")).unwrap();
        insert_article(&mut conn, &NewArticle::new("Two", "Body", "News")).unwrap();

        assert_eq!(truncate_articles(&mut conn).unwrap(), 2);
        assert!(get_all_articles(&mut conn).unwrap().is_empty());

        let fresh = insert_article(&mut conn, &NewArticle::new("Three", "Body", "News")).unwrap();
        assert_eq!(fresh.id, 1);
    }
}

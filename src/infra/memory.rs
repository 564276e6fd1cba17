//! In-memory durable store.
//!
//! Backs every repository trait with ordered maps behind `RwLock`s. Ids come
//! from a per-table sequence starting at 1 and are never reused.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::application::pagination::{PageRequest, PageResult, SortDirection};
use crate::application::repos::{
    CategoriesRepo, CommentsRepo, PostsRepo, RepoError, SaveCategoryParams, SaveCommentParams,
    SavePostParams,
};
use crate::domain::entities::{CategoryRecord, CommentRecord, PostRecord};
use crate::domain::types::PostSortField;

#[derive(Debug)]
struct Table<T> {
    last_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            last_id: 0,
            rows: BTreeMap::new(),
        }
    }

    fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn rows(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    /// Insert when `id` is unset, otherwise overwrite the existing row.
    fn save(&mut self, id: Option<i64>, build: impl FnOnce(i64) -> T) -> Result<T, RepoError> {
        let id = match id {
            Some(id) if self.rows.contains_key(&id) => id,
            Some(_) => return Err(RepoError::NotFound),
            None => {
                self.last_id += 1;
                self.last_id
            }
        };
        let row = build(id);
        self.rows.insert(id, row.clone());
        Ok(row)
    }

    fn remove(&mut self, id: i64) -> Result<(), RepoError> {
        self.rows.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[derive(Debug)]
pub struct InMemoryRepositories {
    categories: RwLock<Table<CategoryRecord>>,
    posts: RwLock<Table<PostRecord>>,
    comments: RwLock<Table<CommentRecord>>,
}

impl Default for InMemoryRepositories {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepositories {
    pub fn new() -> Self {
        Self {
            categories: RwLock::new(Table::new()),
            posts: RwLock::new(Table::new()),
            comments: RwLock::new(Table::new()),
        }
    }
}

fn read<'a, T>(
    lock: &'a RwLock<Table<T>>,
    table: &'static str,
) -> Result<RwLockReadGuard<'a, Table<T>>, RepoError> {
    lock.read()
        .map_err(|_| RepoError::from_persistence(format!("table `{table}` lock poisoned")))
}

fn write<'a, T>(
    lock: &'a RwLock<Table<T>>,
    table: &'static str,
) -> Result<RwLockWriteGuard<'a, Table<T>>, RepoError> {
    lock.write()
        .map_err(|_| RepoError::from_persistence(format!("table `{table}` lock poisoned")))
}

impl CategoriesRepo for InMemoryRepositories {
    fn find_by_id(&self, id: i64) -> Result<Option<CategoryRecord>, RepoError> {
        Ok(read(&self.categories, "categories")?.get(id))
    }

    fn find_all(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        Ok(read(&self.categories, "categories")?
            .rows()
            .cloned()
            .collect())
    }

    fn save(&self, params: SaveCategoryParams) -> Result<CategoryRecord, RepoError> {
        let SaveCategoryParams {
            id,
            name,
            description,
        } = params;
        write(&self.categories, "categories")?.save(id, |id| CategoryRecord {
            id,
            name,
            description,
        })
    }

    fn delete(&self, category: &CategoryRecord) -> Result<(), RepoError> {
        write(&self.categories, "categories")?.remove(category.id)
    }
}

impl PostsRepo for InMemoryRepositories {
    fn find_by_id(&self, id: i64) -> Result<Option<PostRecord>, RepoError> {
        Ok(read(&self.posts, "posts")?.get(id))
    }

    fn find_page(&self, request: &PageRequest) -> Result<PageResult<PostRecord>, RepoError> {
        let field = PostSortField::try_from(request.sort_field()).map_err(|_| {
            RepoError::invalid_input(format!(
                "no property `{}` found for type `Post`",
                request.sort_field()
            ))
        })?;

        let mut rows: Vec<PostRecord> = read(&self.posts, "posts")?.rows().cloned().collect();
        // Stable sort: rows start in id order, so ties keep ascending ids.
        rows.sort_by(|a, b| {
            let ordering = compare_posts(field, a, b);
            match request.direction() {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        Ok(PageResult::from_sorted(rows, request))
    }

    fn find_by_category(&self, category_id: i64) -> Result<Vec<PostRecord>, RepoError> {
        Ok(read(&self.posts, "posts")?
            .rows()
            .filter(|post| post.category_id == category_id)
            .cloned()
            .collect())
    }

    fn save(&self, params: SavePostParams) -> Result<PostRecord, RepoError> {
        let SavePostParams {
            id,
            title,
            description,
            content,
            category_id,
        } = params;
        write(&self.posts, "posts")?.save(id, |id| PostRecord {
            id,
            title,
            description,
            content,
            category_id,
        })
    }

    fn delete(&self, post: &PostRecord) -> Result<(), RepoError> {
        write(&self.posts, "posts")?.remove(post.id)
    }
}

impl CommentsRepo for InMemoryRepositories {
    fn find_by_id(&self, id: i64) -> Result<Option<CommentRecord>, RepoError> {
        Ok(read(&self.comments, "comments")?.get(id))
    }

    fn find_by_post(&self, post_id: i64) -> Result<Vec<CommentRecord>, RepoError> {
        Ok(read(&self.comments, "comments")?
            .rows()
            .filter(|comment| comment.belongs_to(post_id))
            .cloned()
            .collect())
    }

    fn save(&self, params: SaveCommentParams) -> Result<CommentRecord, RepoError> {
        let SaveCommentParams {
            id,
            name,
            email,
            content,
            post_id,
        } = params;
        write(&self.comments, "comments")?.save(id, |id| CommentRecord {
            id,
            name,
            email,
            content,
            post_id,
        })
    }

    fn delete(&self, comment: &CommentRecord) -> Result<(), RepoError> {
        write(&self.comments, "comments")?.remove(comment.id)
    }
}

fn compare_posts(field: PostSortField, a: &PostRecord, b: &PostRecord) -> Ordering {
    match field {
        PostSortField::Id => a.id.cmp(&b.id),
        PostSortField::Title => a.title.cmp(&b.title),
        PostSortField::Description => a.description.cmp(&b.description),
        PostSortField::Content => a.content.cmp(&b.content),
        PostSortField::CategoryId => a.category_id.cmp(&b.category_id),
    }
}

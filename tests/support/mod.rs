//! Shared fixtures for service-level integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};

use quire::application::pagination::{PageRequest, PageResult};
use quire::application::repos::{
    CategoriesRepo, CommentsRepo, PostsRepo, RepoError, SaveCategoryParams, SaveCommentParams,
    SavePostParams,
};
use quire::application::services::ContentServices;
use quire::cache::{Cache, CacheConfig, L0Store};
use quire::domain::entities::{CategoryRecord, CommentRecord, PostRecord};
use quire::infra::memory::InMemoryRepositories;

/// In-memory store that counts how often each kind of call reaches it.
#[derive(Default)]
pub struct CountingRepos {
    inner: InMemoryRepositories,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
}

impl CountingRepos {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }

    fn write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

impl CategoriesRepo for CountingRepos {
    fn find_by_id(&self, id: i64) -> Result<Option<CategoryRecord>, RepoError> {
        self.read();
        CategoriesRepo::find_by_id(&self.inner, id)
    }

    fn find_all(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        self.read();
        self.inner.find_all()
    }

    fn save(&self, params: SaveCategoryParams) -> Result<CategoryRecord, RepoError> {
        self.write();
        CategoriesRepo::save(&self.inner, params)
    }

    fn delete(&self, category: &CategoryRecord) -> Result<(), RepoError> {
        self.write();
        CategoriesRepo::delete(&self.inner, category)
    }
}

impl PostsRepo for CountingRepos {
    fn find_by_id(&self, id: i64) -> Result<Option<PostRecord>, RepoError> {
        self.read();
        PostsRepo::find_by_id(&self.inner, id)
    }

    fn find_page(&self, request: &PageRequest) -> Result<PageResult<PostRecord>, RepoError> {
        self.read();
        self.inner.find_page(request)
    }

    fn find_by_category(&self, category_id: i64) -> Result<Vec<PostRecord>, RepoError> {
        self.read();
        self.inner.find_by_category(category_id)
    }

    fn save(&self, params: SavePostParams) -> Result<PostRecord, RepoError> {
        self.write();
        PostsRepo::save(&self.inner, params)
    }

    fn delete(&self, post: &PostRecord) -> Result<(), RepoError> {
        self.write();
        PostsRepo::delete(&self.inner, post)
    }
}

impl CommentsRepo for CountingRepos {
    fn find_by_id(&self, id: i64) -> Result<Option<CommentRecord>, RepoError> {
        self.read();
        CommentsRepo::find_by_id(&self.inner, id)
    }

    fn find_by_post(&self, post_id: i64) -> Result<Vec<CommentRecord>, RepoError> {
        self.read();
        self.inner.find_by_post(post_id)
    }

    fn save(&self, params: SaveCommentParams) -> Result<CommentRecord, RepoError> {
        self.write();
        CommentsRepo::save(&self.inner, params)
    }

    fn delete(&self, comment: &CommentRecord) -> Result<(), RepoError> {
        self.write();
        CommentsRepo::delete(&self.inner, comment)
    }
}

/// In-memory store that can hold one armed read after it has loaded its
/// rows, so a test can run a mutation in between the load and the cache fill.
pub struct GatedRepos {
    inner: InMemoryRepositories,
    armed: AtomicBool,
    loaded: Barrier,
    resume: Barrier,
}

impl Default for GatedRepos {
    fn default() -> Self {
        Self {
            inner: InMemoryRepositories::new(),
            armed: AtomicBool::new(false),
            loaded: Barrier::new(2),
            resume: Barrier::new(2),
        }
    }
}

impl GatedRepos {
    /// Hold the next read, from any thread, once it has loaded its rows.
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    /// Block until the held read has loaded.
    pub fn wait_loaded(&self) {
        self.loaded.wait();
    }

    /// Let the held read return.
    pub fn release(&self) {
        self.resume.wait();
    }

    fn hold<T>(&self, rows: T) -> T {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.loaded.wait();
            self.resume.wait();
        }
        rows
    }
}

impl CategoriesRepo for GatedRepos {
    fn find_by_id(&self, id: i64) -> Result<Option<CategoryRecord>, RepoError> {
        self.hold(CategoriesRepo::find_by_id(&self.inner, id))
    }

    fn find_all(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        self.hold(self.inner.find_all())
    }

    fn save(&self, params: SaveCategoryParams) -> Result<CategoryRecord, RepoError> {
        CategoriesRepo::save(&self.inner, params)
    }

    fn delete(&self, category: &CategoryRecord) -> Result<(), RepoError> {
        CategoriesRepo::delete(&self.inner, category)
    }
}

impl PostsRepo for GatedRepos {
    fn find_by_id(&self, id: i64) -> Result<Option<PostRecord>, RepoError> {
        self.hold(PostsRepo::find_by_id(&self.inner, id))
    }

    fn find_page(&self, request: &PageRequest) -> Result<PageResult<PostRecord>, RepoError> {
        self.hold(self.inner.find_page(request))
    }

    fn find_by_category(&self, category_id: i64) -> Result<Vec<PostRecord>, RepoError> {
        self.hold(self.inner.find_by_category(category_id))
    }

    fn save(&self, params: SavePostParams) -> Result<PostRecord, RepoError> {
        PostsRepo::save(&self.inner, params)
    }

    fn delete(&self, post: &PostRecord) -> Result<(), RepoError> {
        PostsRepo::delete(&self.inner, post)
    }
}

impl CommentsRepo for GatedRepos {
    fn find_by_id(&self, id: i64) -> Result<Option<CommentRecord>, RepoError> {
        self.hold(CommentsRepo::find_by_id(&self.inner, id))
    }

    fn find_by_post(&self, post_id: i64) -> Result<Vec<CommentRecord>, RepoError> {
        self.hold(self.inner.find_by_post(post_id))
    }

    fn save(&self, params: SaveCommentParams) -> Result<CommentRecord, RepoError> {
        CommentsRepo::save(&self.inner, params)
    }

    fn delete(&self, comment: &CommentRecord) -> Result<(), RepoError> {
        CommentsRepo::delete(&self.inner, comment)
    }
}

pub struct Harness<R = CountingRepos> {
    pub services: ContentServices,
    pub repos: Arc<R>,
    pub cache: Arc<L0Store>,
}

pub fn harness() -> Harness {
    harness_with(CacheConfig::default())
}

pub fn harness_with(config: CacheConfig) -> Harness {
    harness_over(Arc::new(CountingRepos::default()), &config)
}

pub fn gated_harness() -> Harness<GatedRepos> {
    harness_over(Arc::new(GatedRepos::default()), &CacheConfig::default())
}

fn harness_over<R>(repos: Arc<R>, config: &CacheConfig) -> Harness<R>
where
    R: CategoriesRepo + PostsRepo + CommentsRepo + 'static,
{
    let cache = Arc::new(L0Store::new(config));
    let shared: Arc<dyn Cache> = cache.clone();
    let services = ContentServices::new(repos.clone(), shared);
    Harness {
        services,
        repos,
        cache,
    }
}

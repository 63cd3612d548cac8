// ==========================================
// 车行后台管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务规则，只做数据 CRUD；
//       所有操作显式携带租户标识
// ==========================================

pub mod error;
pub mod import_batch_repo;
pub mod import_batch_repo_impl;

pub use error::{RepositoryError, RepositoryResult};
pub use import_batch_repo::ImportBatchRepository;
pub use import_batch_repo_impl::ImportBatchRepositoryImpl;

use std::path::PathBuf;

use anyhow::Context;
use axum::async_trait;
use bytes::Bytes;

/// Two-phase image store: files land in a staging area first and become
/// publicly visible only on commit, so a rejected request never leaves
/// orphaned files behind.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn stage(&self, filename: &str, body: Bytes) -> anyhow::Result<()>;
    /// Move staged files to the public area.
    async fn commit(&self, filenames: &[String]) -> anyhow::Result<()>;
    /// Best-effort removal of a staged batch.
    async fn discard(&self, filenames: &[String]);
}

/// Disk-backed store rooted at the configured upload directory, which is
/// served at `/uploads`.
#[derive(Clone)]
pub struct LocalStore {
    root: PathBuf,
    staging: PathBuf,
}

impl LocalStore {
    pub async fn new(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        let staging = root.join(".staging");
        tokio::fs::create_dir_all(&staging)
            .await
            .with_context(|| format!("create upload dirs under {}", root.display()))?;
        Ok(Self { root, staging })
    }
}

#[async_trait]
impl ImageStore for LocalStore {
    async fn stage(&self, filename: &str, body: Bytes) -> anyhow::Result<()> {
        let path = self.staging.join(filename);
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("stage {}", path.display()))
    }

    async fn commit(&self, filenames: &[String]) -> anyhow::Result<()> {
        for name in filenames {
            tokio::fs::rename(self.staging.join(name), self.root.join(name))
                .await
                .with_context(|| format!("commit {}", name))?;
        }
        Ok(())
    }

    async fn discard(&self, filenames: &[String]) {
        for name in filenames {
            let _ = tokio::fs::remove_file(self.staging.join(name)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    async fn temp_store() -> (LocalStore, PathBuf) {
        let root = std::env::temp_dir().join(format!("fooddiscover-test-{}", Uuid::new_v4()));
        let store = LocalStore::new(&root).await.expect("create store");
        (store, root)
    }

    #[tokio::test]
    async fn staged_files_are_hidden_until_commit() {
        let (store, root) = temp_store().await;
        store
            .stage("1_0_pizza.jpg", Bytes::from_static(b"jpegdata"))
            .await
            .unwrap();
        assert!(!root.join("1_0_pizza.jpg").exists());

        store.commit(&["1_0_pizza.jpg".into()]).await.unwrap();
        assert!(root.join("1_0_pizza.jpg").exists());
        assert!(!root.join(".staging/1_0_pizza.jpg").exists());

        let _ = tokio::fs::remove_dir_all(root).await;
    }

    #[tokio::test]
    async fn discard_removes_staged_batch() {
        let (store, root) = temp_store().await;
        store
            .stage("2_0_a.png", Bytes::from_static(b"png"))
            .await
            .unwrap();
        store
            .stage("2_1_b.png", Bytes::from_static(b"png"))
            .await
            .unwrap();
        store
            .discard(&["2_0_a.png".into(), "2_1_b.png".into()])
            .await;
        assert!(!root.join(".staging/2_0_a.png").exists());
        assert!(!root.join(".staging/2_1_b.png").exists());

        let _ = tokio::fs::remove_dir_all(root).await;
    }
}

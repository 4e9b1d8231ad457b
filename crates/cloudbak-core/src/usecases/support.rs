//! In-memory port fakes shared by the use case tests.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::bail;
use chrono::{Duration, Utc};

use crate::domain::{LocalBackup, RemoteObject, RemotePath, Slug, TokenState};
use crate::ports::{IBackupSource, IRemoteStore, ITokenStore};

/// Token store backed by a mutex-guarded option.
#[derive(Default)]
pub(crate) struct MemoryTokenStore {
    record: Mutex<Option<TokenState>>,
}

#[async_trait::async_trait]
impl ITokenStore for MemoryTokenStore {
    async fn load(&self) -> anyhow::Result<Option<TokenState>> {
        Ok(self.record.lock().unwrap().clone())
    }

    async fn save(&self, tokens: &TokenState) -> anyhow::Result<()> {
        *self.record.lock().unwrap() = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        *self.record.lock().unwrap() = None;
        Ok(())
    }
}

/// Backup source returning a fixed scan result.
#[derive(Default)]
pub(crate) struct MemoryBackupSource {
    backups: BTreeMap<Slug, LocalBackup>,
    fail: AtomicBool,
}

impl MemoryBackupSource {
    pub(crate) fn new(backups: BTreeMap<Slug, LocalBackup>) -> Self {
        Self {
            backups,
            fail: AtomicBool::new(false),
        }
    }

    pub(crate) fn fail_scan(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl IBackupSource for MemoryBackupSource {
    async fn scan(&self) -> anyhow::Result<BTreeMap<Slug, LocalBackup>> {
        if self.fail.load(Ordering::SeqCst) {
            bail!("backup directory unreadable");
        }
        Ok(self.backups.clone())
    }
}

/// Remote store that records calls and fails on demand.
#[derive(Default)]
pub(crate) struct FakeRemoteStore {
    objects: Mutex<Vec<RemoteObject>>,
    uploads: Mutex<Vec<String>>,
    removals: Mutex<Vec<String>>,
    exchanges: Mutex<Vec<String>>,
    refreshes: AtomicUsize,
    fail_list: AtomicBool,
    fail_token: AtomicBool,
    fail_refresh: AtomicBool,
    fail_upload_at: Mutex<Option<usize>>,
    fail_remove_at: Mutex<Option<usize>>,
}

impl FakeRemoteStore {
    pub(crate) const ISSUED_ACCESS: &'static str = "access-issued";

    pub(crate) fn set_objects(&self, objects: Vec<RemoteObject>) {
        *self.objects.lock().unwrap() = objects;
    }

    pub(crate) fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    pub(crate) fn removals(&self) -> Vec<String> {
        self.removals.lock().unwrap().clone()
    }

    pub(crate) fn token_exchanges(&self) -> Vec<String> {
        self.exchanges.lock().unwrap().clone()
    }

    pub(crate) fn refresh_calls(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_listing(&self) {
        self.fail_list.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_token_exchange(&self) {
        self.fail_token.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_refresh(&self) {
        self.fail_refresh.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_upload_at(&self, index: usize) {
        *self.fail_upload_at.lock().unwrap() = Some(index);
    }

    pub(crate) fn fail_remove_at(&self, index: usize) {
        *self.fail_remove_at.lock().unwrap() = Some(index);
    }

    fn issued() -> TokenState {
        TokenState {
            access_token: Self::ISSUED_ACCESS.to_string(),
            refresh_token: "refresh-issued".to_string(),
            expires_at: Utc::now() + Duration::days(60),
        }
    }
}

#[async_trait::async_trait]
impl IRemoteStore for FakeRemoteStore {
    async fn list(
        &self,
        _access_token: &str,
        _path: &RemotePath,
    ) -> anyhow::Result<Vec<RemoteObject>> {
        if self.fail_list.load(Ordering::SeqCst) {
            bail!("listing failed");
        }
        Ok(self.objects.lock().unwrap().clone())
    }

    async fn upload(
        &self,
        _access_token: &str,
        _local_path: &Path,
        remote_path: &str,
        _overwrite: bool,
    ) -> anyhow::Result<()> {
        let mut uploads = self.uploads.lock().unwrap();
        if *self.fail_upload_at.lock().unwrap() == Some(uploads.len()) {
            bail!("upload failed for {remote_path}");
        }
        uploads.push(remote_path.to_string());
        Ok(())
    }

    async fn remove(&self, _access_token: &str, remote_path: &str) -> anyhow::Result<()> {
        let mut removals = self.removals.lock().unwrap();
        if *self.fail_remove_at.lock().unwrap() == Some(removals.len()) {
            bail!("remove failed for {remote_path}");
        }
        removals.push(remote_path.to_string());
        Ok(())
    }

    async fn get_token(&self, check_code: &str) -> anyhow::Result<TokenState> {
        if self.fail_token.load(Ordering::SeqCst) {
            bail!("check code rejected");
        }
        self.exchanges.lock().unwrap().push(check_code.to_string());
        Ok(Self::issued())
    }

    async fn refresh_token(&self, _refresh_token: &str) -> anyhow::Result<TokenState> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        if self.fail_refresh.load(Ordering::SeqCst) {
            bail!("refresh rejected");
        }
        Ok(Self::issued())
    }
}

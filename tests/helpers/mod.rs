use phrasesnap::application::SyncCoordinator;
use phrasesnap::util::testing::{MockClipboard, MockRemoteStore, TestCache};

pub const USER: &str = "user-1";

/// Wire a coordinator around a temp-dir cache and the given mock remote.
///
/// The returned clipboard handle shares state with the one the coordinator
/// owns, so tests can inspect what was copied.
pub fn coordinator(
    cache: &TestCache,
    remote: MockRemoteStore,
) -> (
    SyncCoordinator<MockRemoteStore, MockClipboard>,
    MockClipboard,
) {
    let clipboard = MockClipboard::default();
    let coordinator = SyncCoordinator::new(remote, cache.open(), clipboard.clone());
    (coordinator, clipboard)
}

//! # 远端同步根目录抽象
//!
//! ## 设计思路
//!
//! 远端存储本身在系统控制之外：这里只定义贴纸库对它的最小依赖——
//! 一个目录路径、一条变更事件通道、以及“占位条目按需物化”的钩子。
//! 对账器面向该接口编程，不绑定任何具体同步实现。
//!
//! 事件按批次投递到单消费者通道，消费侧天然串行，
//! 取代了“暂停通知 → 重算 → 恢复通知”式的互斥括号。

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

/// 远端根目录的变更事件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootEvent {
    /// 目录新增了一个条目。
    Added(PathBuf),
    /// 目录移除了一个条目。
    Removed(PathBuf),
}

/// 远端同步目录能力接口。
pub trait SyncedRoot: Send {
    /// 目录路径。
    fn base(&self) -> &Path;

    /// 取走变更事件接收端；只能取走一次，再次调用返回 `None`。
    fn subscribe(&mut self) -> Option<mpsc::Receiver<Vec<RootEvent>>>;

    /// 该条目是否是尚未物化到本地的远端占位。
    fn needs_materialize(&self, _path: &Path) -> bool {
        false
    }

    /// 请求把远端占位条目下载到本地。
    fn materialize(&self, _path: &Path) -> std::io::Result<()> {
        Ok(())
    }
}

/// 纯本地目录实现：没有远端，事件由持有发送端的一方注入。
///
/// 生产上对应“远端容器不可用”的兜底路径，测试里用来驱动对账器。
pub struct LocalSyncedRoot {
    base: PathBuf,
    events: Option<mpsc::Receiver<Vec<RootEvent>>>,
}

impl LocalSyncedRoot {
    /// 创建目录句柄，返回配套的事件发送端。
    pub fn new(base: impl Into<PathBuf>) -> (Self, mpsc::Sender<Vec<RootEvent>>) {
        let (sender, receiver) = mpsc::channel(16);
        (
            Self {
                base: base.into(),
                events: Some(receiver),
            },
            sender,
        )
    }
}

impl SyncedRoot for LocalSyncedRoot {
    fn base(&self) -> &Path {
        &self.base
    }

    fn subscribe(&mut self) -> Option<mpsc::Receiver<Vec<RootEvent>>> {
        self.events.take()
    }
}

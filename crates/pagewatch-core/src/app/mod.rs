//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせて fetch → diff → notify の
//! ループを実装します。
//!
//! # 主要コンポーネント
//! - **AppBuilder**: アプリケーションの構築とワイヤリング
//! - **ChangeDetector**: スナップショットとの突き合わせで変更を抽出
//! - **PollLoop**: priming と定期 tick（再アーム式スケジューラ）
//! - **PollCounts**: 観測用カウンタ

pub mod builder;
pub mod detector;
pub mod poll_loop;
pub mod status;

// 主要な型を再エクスポート
pub use self::builder::{AppBuilder, BuildError};
pub use self::detector::ChangeDetector;
pub use self::poll_loop::PollLoop;
pub use self::status::PollCounts;

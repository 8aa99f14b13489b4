/// UI components module
///
/// Custom pieces that sit on top of the stock iced widgets:
/// - The draggable before/after comparison canvas (compare.rs)
/// - The recent-images grid (recent.rs)
/// - Transient toast notices (toast.rs)

pub mod compare;
pub mod recent;
pub mod toast;

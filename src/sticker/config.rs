//! # 渲染参数模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `RenderParams`，保证流水线行为可观测、可调整、可测试。
//! 运行期唯一的变更入口是边框开关；每次流水线调用都使用一份按值快照，
//! 避免处理中途参数漂移。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的参数组合。
//! - 描边厚度、阴影模糊与偏移均由图像长边按固定比例推导，
//!   推导函数集中在这里，编码器只管调用。

/// 贴纸渲染参数。
///
/// 字段覆盖了缩放目标、字节预算与边框装饰三个方面。
#[derive(Debug, Clone)]
pub struct RenderParams {
    /// 缩放目标长边（像素）。超过该值的输入先整体缩小。
    pub target_long_side: u32,
    /// 字节预算超限时的纠正缩放长边（像素）。
    pub min_long_side: u32,
    /// 输出文件的硬性字节上限。
    pub max_file_bytes: usize,
    /// 是否启用白色描边 + 阴影装饰。
    pub border_enabled: bool,
    /// 描边厚度 = 长边 / 该除数。
    pub border_thickness_divisor: u32,
    /// 旋转描边的角度步进（度）。步进越小描边越平滑，盖章次数越多。
    pub stroke_angle_step_degrees: f32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            target_long_side: 534,
            min_long_side: 300,
            max_file_bytes: 512_000,
            border_enabled: true,
            border_thickness_divisor: 20,
            stroke_angle_step_degrees: 8.0,
        }
    }
}

impl RenderParams {
    /// 按长边推导描边厚度，下限 1 像素。
    pub fn stroke_thickness(&self, long_side: u32) -> u32 {
        (long_side / self.border_thickness_divisor).max(1)
    }

    /// 阴影模糊半径 = 描边厚度的一半。
    pub fn shadow_blur(&self, thickness: u32) -> u32 {
        thickness / 2
    }

    /// 阴影偏移：水平不偏移，垂直向下四分之一厚度。
    pub fn shadow_offset(&self, thickness: u32) -> (i64, i64) {
        (0, i64::from(thickness / 4))
    }
}

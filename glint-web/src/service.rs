//! 服务层支持
//!
//! `#[service]` 宏提交的声明式元数据：服务的逻辑名称与事务只读提示。
//! 元数据在应用启动时被枚举并记录日志；事务语义由宿主环境（如数据库驱动）
//! 负责，本层不实现任何事务逻辑

/// 服务注册信息
pub struct ServiceRegistration {
    /// 服务类型名称
    pub type_name: &'static str,

    /// 逻辑名称，默认由类型名推导
    pub name: &'static str,

    /// 默认事务是否只读（声明式元数据）
    pub read_only: bool,
}

inventory::collect!(ServiceRegistration);

/// 获取所有注册的服务
pub fn get_all_services() -> impl Iterator<Item = &'static ServiceRegistration> {
    inventory::iter::<ServiceRegistration>()
}

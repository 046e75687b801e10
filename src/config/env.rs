use crate::error::{IvrError, Result};
use crate::flow::constants::names;
use std::env;
use std::path::PathBuf;

pub const FLOWS_DIR_ENV: &str = "IVRFLOW_FLOWS_DIR";
pub const ROOT_FLOW_ENV: &str = "IVRFLOW_ROOT_FLOW";
pub const SEED_ENV: &str = "IVRFLOW_SEED";
pub const CLASSIFIER_CONFIG_ENV: &str = "IVRFLOW_CLASSIFIER_CONFIG";

const DEFAULT_FLOWS_DIR: &str = "flows";

/// 环境变量配置管理
pub struct EnvConfig;

impl EnvConfig {
    /// 获取可选的环境变量
    pub fn get_env_optional(key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.trim().is_empty())
    }

    /// 流程目录，默认 `flows`
    pub fn flows_dir() -> PathBuf {
        Self::get_env_optional(FLOWS_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FLOWS_DIR))
    }

    /// 根流程名，默认 `train_main`
    pub fn root_flow() -> String {
        Self::get_env_optional(ROOT_FLOW_ENV).unwrap_or_else(|| names::ROOT_FLOW.to_string())
    }

    /// 模拟后端的随机种子
    pub fn seed() -> Result<Option<u64>> {
        match Self::get_env_optional(SEED_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|_| IvrError::Config(format!("`{SEED_ENV}` must be an unsigned integer, got `{raw}`"))),
            None => Ok(None),
        }
    }

    /// 可选的分类器配置文件
    pub fn classifier_config() -> Option<PathBuf> {
        Self::get_env_optional(CLASSIFIER_CONFIG_ENV).map(PathBuf::from)
    }
}

/// 运行设置
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IvrSettings {
    pub flows_dir: PathBuf,
    pub root_flow: String,
    pub seed: Option<u64>,
    pub classifier_config: Option<PathBuf>,
}

impl Default for IvrSettings {
    fn default() -> Self {
        Self {
            flows_dir: PathBuf::from(DEFAULT_FLOWS_DIR),
            root_flow: names::ROOT_FLOW.to_string(),
            seed: None,
            classifier_config: None,
        }
    }
}

impl IvrSettings {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            flows_dir: EnvConfig::flows_dir(),
            root_flow: EnvConfig::root_flow(),
            seed: EnvConfig::seed()?,
            classifier_config: EnvConfig::classifier_config(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_env() {
        env::set_var(FLOWS_DIR_ENV, "/tmp/ivr-flows");
        env::set_var(SEED_ENV, "42");
        env::remove_var(ROOT_FLOW_ENV);
        let settings = IvrSettings::from_env().unwrap();
        assert_eq!(settings.flows_dir, PathBuf::from("/tmp/ivr-flows"));
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.root_flow, "train_main");

        env::set_var(SEED_ENV, "not-a-number");
        assert!(matches!(IvrSettings::from_env(), Err(IvrError::Config(_))));

        env::remove_var(FLOWS_DIR_ENV);
        env::remove_var(SEED_ENV);
    }
}

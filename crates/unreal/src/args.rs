//! Typed argument structs for UAT commands.
//!
//! Each field maps one-to-one to a UAT flag: a `bool` becomes a presence
//! flag (`-cook`), a value becomes `-key=value`, and `None` is omitted.

/// Options that format themselves into UAT command-line flags.
pub trait UatArgs {
    fn to_args(&self) -> Vec<String>;
}

/// Arguments for the `BuildCookRun` UAT command.
///
/// Flag names match the UAT parameter names exactly, lowercase as UAT
/// expects them.
#[derive(Debug, Clone, Default)]
pub struct BuildCookRunArgs {
    pub platform: String,
    pub configuration: String,
    pub build: bool,
    pub clean: bool,
    pub cook: bool,
    pub pak: bool,
    pub stage: bool,
    pub stagingdirectory: Option<String>,
}

impl BuildCookRunArgs {
    pub fn new(platform: impl Into<String>, configuration: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            configuration: configuration.into(),
            ..Self::default()
        }
    }
}

impl UatArgs for BuildCookRunArgs {
    fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("-platform={}", self.platform),
            format!("-configuration={}", self.configuration),
        ];

        for (flag, enabled) in [
            ("-build", self.build),
            ("-clean", self.clean),
            ("-cook", self.cook),
            ("-pak", self.pak),
            ("-stage", self.stage),
        ] {
            if enabled {
                args.push(flag.to_string());
            }
        }

        if let Some(dir) = &self.stagingdirectory {
            args.push(format!("-stagingdirectory={dir}"));
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_values_always_format() {
        let args = BuildCookRunArgs::new("Win64", "Shipping").to_args();
        assert_eq!(args[0], "-platform=Win64");
        assert_eq!(args[1], "-configuration=Shipping");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn enabled_bools_become_presence_flags() {
        let args = BuildCookRunArgs {
            cook: true,
            pak: true,
            stage: true,
            ..BuildCookRunArgs::new("Linux", "Development")
        }
        .to_args();

        assert!(args.contains(&"-cook".to_string()));
        assert!(args.contains(&"-pak".to_string()));
        assert!(args.contains(&"-stage".to_string()));
        assert!(!args.contains(&"-build".to_string()));
    }

    #[test]
    fn optional_values_are_omitted_when_absent() {
        let mut bcr = BuildCookRunArgs::new("Win64", "Shipping");
        assert!(!bcr.to_args().iter().any(|a| a.starts_with("-stagingdirectory")));

        bcr.stagingdirectory = Some("Staged".to_string());
        assert!(bcr.to_args().contains(&"-stagingdirectory=Staged".to_string()));
    }
}

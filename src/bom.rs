//! CycloneDX bill-of-materials generation.
//!
//! The BOM is produced by applying the CycloneDX Gradle plugin through a
//! fixed init script and running its `cyclonedxBom` task. The plugin version
//! and output settings are pinned; the resulting file is left on disk for
//! later scanning steps and is not read back here.

use crate::config::BuildConfiguration;
use crate::error::{Result, StepError};
use crate::executor::{ExecutionRequest, TaskExecutor};
use crate::pipeline::Stage;

/// Gradle task provided by the CycloneDX plugin.
pub const BOM_TASK: &str = "cyclonedxBom";

/// Base name of the generated BOM file.
pub const BOM_FILENAME: &str = "bom-gradle";

/// Init script that applies the CycloneDX plugin.
pub const BOM_INIT_SCRIPT: &str = r#"
initscript {
  repositories {
    mavenCentral()
    maven {
      url "https://plugins.gradle.org/m2/"
    }
  }
  dependencies {
    classpath "org.cyclonedx:cyclonedx-gradle-plugin:1.7.0"
  }
}

rootProject {
    apply plugin: 'java'
    apply plugin: 'maven'
    apply plugin: org.cyclonedx.gradle.CycloneDxPlugin

    cyclonedxBom {
	outputName = "bom-gradle"
	outputFormat = "xml"
	schemaVersion = "1.2"
    }
}
"#;

/// Runs the CycloneDX BOM task for the configured project.
///
/// # Errors
///
/// Returns [`StepError::BuildExecution`] for the [`Stage::Bom`] stage if the
/// task fails.
pub fn create_bom(config: &BuildConfiguration, executor: &dyn TaskExecutor) -> Result<()> {
    let request = ExecutionRequest::for_task(config, BOM_TASK).with_init_script(BOM_INIT_SCRIPT);
    executor
        .execute(&request)
        .map_err(|source| StepError::BuildExecution {
            stage: Stage::Bom,
            task: BOM_TASK.to_owned(),
            source,
        })?;
    log::info!("created BOM {BOM_FILENAME} for {}", config.path);
    Ok(())
}

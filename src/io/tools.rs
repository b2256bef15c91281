//! External raster command-line tools (GDAL utilities).
//!
//! Requests are typed; [`RasterToolRunner`] turns a [`ToolInvocation`] into a process
//! run so callers and tests can swap in their own executor.

use crate::types::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Program name plus argument vector, ready to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<String>,
}

/// Captured result of a successful tool run
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Executes external raster tools
pub trait RasterToolRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput>;
}

/// Runs tools as child processes found on `PATH`
#[derive(Debug, Clone, Default)]
pub struct CommandRunner;

impl RasterToolRunner for CommandRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        log::info!("Running {} {}", invocation.program, invocation.args.join(" "));

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .output()
            .map_err(|e| Error::Tool(format!("{} exec error: {}", invocation.program, e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            log::error!("{} failed: {}", invocation.program, stderr.trim());
            return Err(Error::Tool(format!(
                "{} exited with {}: {}",
                invocation.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(ToolOutput { stdout, stderr })
    }
}

/// Reproject and resample a raster to a target CRS and pixel size with `gdalwarp`
#[derive(Debug, Clone)]
pub struct WarpRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub source_epsg: u32,
    pub target_epsg: u32,
    /// Output pixel size, in target CRS units
    pub resolution: f64,
}

impl WarpRequest {
    pub fn to_invocation(&self) -> Result<ToolInvocation> {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(Error::Tool(format!("Invalid warp resolution: {}", self.resolution)));
        }
        let resolution = self.resolution.to_string();

        Ok(ToolInvocation {
            program: "gdalwarp".to_string(),
            args: vec![
                "-of".to_string(),
                "GTiff".to_string(),
                "-tr".to_string(),
                resolution.clone(),
                resolution,
                "-s_srs".to_string(),
                format!("EPSG:{}", self.source_epsg),
                "-t_srs".to_string(),
                format!("EPSG:{}", self.target_epsg),
                path_arg(&self.input)?,
                path_arg(&self.output)?,
            ],
        })
    }
}

/// Vectorize a raster into an ESRI shapefile with `gdal_polygonize.py`
#[derive(Debug, Clone)]
pub struct PolygonizeRequest {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl PolygonizeRequest {
    pub fn to_invocation(&self) -> Result<ToolInvocation> {
        Ok(ToolInvocation {
            program: "gdal_polygonize.py".to_string(),
            args: vec![path_arg(&self.input)?, path_arg(&self.output)?],
        })
    }
}

fn path_arg(path: &Path) -> Result<String> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| Error::Tool(format!("Path is not valid UTF-8: {}", path.display())))
}

/// Resample/reproject a raster file
pub fn reproject_raster_gdalwarp<R: RasterToolRunner + ?Sized>(runner: &R, request: &WarpRequest) -> Result<PathBuf> {
    runner.run(&request.to_invocation()?)?;
    Ok(request.output.clone())
}

/// Convert a raster file to polygons
pub fn gdal_convert_raster_to_shp<R: RasterToolRunner + ?Sized>(
    runner: &R,
    request: &PolygonizeRequest,
) -> Result<PathBuf> {
    runner.run(&request.to_invocation()?)?;
    Ok(request.output.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<ToolInvocation>>,
    }

    impl RasterToolRunner for Recorder {
        fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
            self.calls.borrow_mut().push(invocation.clone());
            Ok(ToolOutput::default())
        }
    }

    #[test]
    fn test_warp_arguments() {
        let request = WarpRequest {
            input: PathBuf::from("/data/in.tif"),
            output: PathBuf::from("/data/out.tif"),
            source_epsg: 4326,
            target_epsg: 32615,
            resolution: 10.0,
        };
        let recorder = Recorder::default();
        let out = reproject_raster_gdalwarp(&recorder, &request).unwrap();

        assert_eq!(out, PathBuf::from("/data/out.tif"));
        let calls = recorder.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "gdalwarp");
        assert_eq!(
            calls[0].args.join(" "),
            "-of GTiff -tr 10 10 -s_srs EPSG:4326 -t_srs EPSG:32615 /data/in.tif /data/out.tif"
        );
    }

    #[test]
    fn test_invalid_resolution_never_runs() {
        let request = WarpRequest {
            input: PathBuf::from("a.tif"),
            output: PathBuf::from("b.tif"),
            source_epsg: 4326,
            target_epsg: 4326,
            resolution: 0.0,
        };
        let recorder = Recorder::default();
        assert!(matches!(reproject_raster_gdalwarp(&recorder, &request), Err(Error::Tool(_))));
        assert!(recorder.calls.borrow().is_empty());
    }

    #[test]
    fn test_polygonize_arguments() {
        let request = PolygonizeRequest {
            input: PathBuf::from("mask.tif"),
            output: PathBuf::from("mask.shp"),
        };
        let invocation = request.to_invocation().unwrap();
        assert_eq!(invocation.program, "gdal_polygonize.py");
        assert_eq!(invocation.args, vec!["mask.tif", "mask.shp"]);
    }

    #[test]
    fn test_missing_program_is_tool_error() {
        let invocation = ToolInvocation {
            program: "definitely-not-a-gdal-binary".to_string(),
            args: vec![],
        };
        assert!(matches!(CommandRunner.run(&invocation), Err(Error::Tool(_))));
    }
}

//! Entity loaders: the out-of-band relational store that normally backs
//! this crate is stood in, for tests and the CLI demo, by flat CSV
//! files — one per entity, `csv` + `serde` deserializing straight into
//! the `model` structs. No schedule joins, no time-of-day filtering,
//! just one row per entity.

use std::path::Path;

use crate::error::Error;
use crate::model::{Line, Point, Route, Step};

/// The full entity set loaded from one network directory.
#[derive(Debug, Clone, Default)]
pub struct Entities {
    pub lines: Vec<Line>,
    pub routes: Vec<Route>,
    pub points: Vec<Point>,
    pub steps: Vec<Step>,
}

/// Reads `lines.csv`, `routes.csv`, `points.csv`, and `steps.csv` from
/// `dir`, each with a header row matching its `model` struct's field
/// names. Rows are not cross-validated here — `graph::build_graph`
/// rejects dangling references at build time.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Entities, Error> {
    let dir = dir.as_ref();
    Ok(Entities {
        lines: read_csv(dir.join("lines.csv"))?,
        routes: read_csv(dir.join("routes.csv"))?,
        points: read_csv(dir.join("points.csv"))?,
        steps: read_csv(dir.join("steps.csv"))?,
    })
}

fn read_csv<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>, Error> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;
    reader
        .deserialize()
        .map(|row| row.map_err(|e| Error::InvalidRow(format!("{}: {e}", path.display()))))
        .collect()
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::InvalidRow(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_a_minimal_network_from_csv() {
        let dir = tempdir();

        write_csv(dir.join("lines.csv"), "id,short_name,color\n1,A,#ff0000\n");
        write_csv(
            dir.join("routes.csv"),
            "id,line_id,is_return,first,distance,time\n1,1,false,1,0.0,0.0\n",
        );
        write_csv(
            dir.join("points.csv"),
            "id,lon,lat\n1,-58.40,-34.60\n2,-58.41,-34.61\n",
        );
        write_csv(
            dir.join("steps.csv"),
            "id,route_id,point_id,next\n1,1,1,2\n2,1,2,\n",
        );

        let entities = load_dir(&dir).unwrap();
        assert_eq!(entities.lines.len(), 1);
        assert_eq!(entities.routes.len(), 1);
        assert_eq!(entities.points.len(), 2);
        assert_eq!(entities.steps.len(), 2);
        assert_eq!(entities.steps[0].next, Some(crate::model::StepId(2)));

        std::fs::remove_dir_all(&dir).ok();
    }

    fn tempdir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "routing-core-test-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_csv(path: std::path::PathBuf, contents: &str) {
        let mut file = std::fs::File::create(path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }
}

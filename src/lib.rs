#![forbid(unsafe_code)]

//! Hierarchical geospatial point clustering for interactive maps.
//!
//! `geocluster` aggregates large sets of GeoJSON point features into cluster
//! glyphs for every map zoom level. All clustering happens once, at
//! [`ClusterIndex::load`]: features are projected onto the spherical-Mercator
//! unit square and merged level by level from the maximum zoom down, each
//! level indexed by an immutable KD-tree ([`KdTree`]). Queries afterwards are
//! cheap range lookups that never mutate the index.
//!
//! ```
//! use geocluster::{ClusterIndex, Options};
//! use geojson::{Feature, Geometry, Value};
//!
//! let features = vec![Feature {
//!     bbox: None,
//!     geometry: Some(Geometry::new(Value::Point(vec![-73.99, 40.73]))),
//!     id: None,
//!     properties: None,
//!     foreign_members: None,
//! }];
//!
//! let mut index = ClusterIndex::new(Options::default());
//! index.load(features)?;
//!
//! let clusters = index.get_clusters([-180.0, -85.0, 180.0, 85.0], 2)?;
//! assert_eq!(clusters.len(), 1);
//! # Ok::<(), geocluster::Error>(())
//! ```

mod error;
mod kdtree;

pub use error::{Error, Result};
pub use kdtree::{KdTree, KdTreeBuilder};

use geojson::{feature::Id, Feature, Geometry, JsonObject, JsonValue, Value};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::time::Instant;

/// Clustering configuration.
#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// Minimum zoom level at which clusters are generated.
    pub min_zoom: u8,

    /// Maximum zoom level at which points are clustered. One level above it
    /// holds the raw, unclustered points. At most 30: cluster ids reserve
    /// 5 bits for the zoom.
    pub max_zoom: u8,

    /// Minimum number of points required to form a cluster.
    pub min_points: u8,

    /// Cluster radius in pixels, relative to `extent`.
    pub radius: f64,

    /// Tile extent in pixels.
    pub extent: f64,

    /// Size of the KD-tree leaf node, affects query performance.
    pub node_size: usize,

    /// Assign the source feature index as the id of non-cluster tile
    /// features that have none of their own.
    pub generate_id: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            min_zoom: 0,
            max_zoom: 16,
            min_points: 2,
            radius: 40.0,
            extent: 512.0,
            node_size: 64,
            generate_id: false,
        }
    }
}

/// Maps one point's properties to their reducible subset.
pub type MapFn = dyn Fn(&JsonObject) -> JsonObject + Send + Sync;

/// Folds one mapped property set into a cluster's accumulator.
pub type ReduceFn = dyn Fn(&mut JsonObject, &JsonObject) + Send + Sync;

/// Optional per-cluster property aggregation.
///
/// When configured on a [`ClusterIndex`], every synthesized cluster carries
/// an accumulator seeded from the mapped properties of its first constituent
/// and folded with each absorbed record's mapped properties. Fold order
/// follows the spatial query order, which is deterministic for a fixed input
/// order and node size; reducers do not have to be commutative, but their
/// output then depends on those inputs.
pub struct Reducer {
    map: Box<MapFn>,
    reduce: Box<ReduceFn>,
}

impl Reducer {
    /// A reducer that folds point properties as they are.
    pub fn new<R>(reduce: R) -> Self
    where
        R: Fn(&mut JsonObject, &JsonObject) + Send + Sync + 'static,
    {
        Reducer {
            map: Box::new(|properties| properties.clone()),
            reduce: Box::new(reduce),
        }
    }

    /// A reducer with a map step extracting the reducible subset of each
    /// point's properties before the fold.
    pub fn with_map<M, R>(map: M, reduce: R) -> Self
    where
        M: Fn(&JsonObject) -> JsonObject + Send + Sync + 'static,
        R: Fn(&mut JsonObject, &JsonObject) + Send + Sync + 'static,
    {
        Reducer {
            map: Box::new(map),
            reduce: Box::new(reduce),
        }
    }
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reducer").finish_non_exhaustive()
    }
}

/// Features of one tile, with point geometry in 0..extent tile-pixel space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub features: Vec<Feature>,
}

/// One point or cluster record in a zoom level's buffer.
#[derive(Clone, Copy, Debug)]
struct PointEntry {
    /// Projected x in the unit square.
    x: f64,

    /// Projected y in the unit square.
    y: f64,

    /// Zoom the record was last processed at; `None` until first visited.
    last_zoom: Option<u8>,

    /// Source feature index, or the synthesized cluster id when `count > 1`.
    id: usize,

    /// Id of the aggregate that absorbed this record, once one has.
    parent: Option<usize>,

    /// Number of source points aggregated into this record.
    count: usize,

    /// Slot in the reduced-property table; `None` without a reducer.
    props: Option<usize>,
}

impl PointEntry {
    fn processed_at(&self, zoom: u8) -> bool {
        self.last_zoom.is_some_and(|z| z <= zoom)
    }
}

/// One zoom level: its record buffer and the KD-tree built over it, in the
/// same slot order.
#[derive(Clone, Debug)]
struct Level {
    tree: KdTree,
    entries: Vec<PointEntry>,
}

impl Level {
    fn build(entries: Vec<PointEntry>, node_size: usize) -> Result<Level> {
        let mut builder = KdTreeBuilder::new(entries.len(), node_size);

        for entry in &entries {
            builder.add(entry.x, entry.y);
        }

        Ok(Level {
            tree: builder.finish()?,
            entries,
        })
    }
}

/// A hierarchical cluster index over GeoJSON point features.
///
/// Build one with [`ClusterIndex::new`] (or
/// [`ClusterIndex::with_reducer`]), fill it with [`load`](Self::load), then
/// query it with [`get_clusters`](Self::get_clusters),
/// [`get_children`](Self::get_children), [`get_leaves`](Self::get_leaves),
/// [`get_cluster_expansion_zoom`](Self::get_cluster_expansion_zoom) and
/// [`get_tile`](Self::get_tile). Queries never mutate the index and may run
/// in parallel.
pub struct ClusterIndex {
    options: Options,
    reducer: Option<Reducer>,

    /// One level per zoom from `min_zoom` to `max_zoom + 1`; empty before
    /// `load`, `None` below `min_zoom`.
    levels: Vec<Option<Level>>,

    /// Input features of the last `load`, in input order.
    points: Vec<Feature>,

    /// Accumulated cluster properties, referenced by record slot.
    cluster_props: Vec<JsonObject>,
}

impl ClusterIndex {
    /// Create an index with the given configuration and no property
    /// reduction.
    ///
    /// # Panics
    ///
    /// Panics if `max_zoom` exceeds 30 or `min_zoom` exceeds `max_zoom`;
    /// both are programmer errors.
    pub fn new(options: Options) -> Self {
        Self::with_optional_reducer(options, None)
    }

    /// Create an index that additionally aggregates custom cluster
    /// properties with `reducer`.
    ///
    /// # Panics
    ///
    /// Same conditions as [`ClusterIndex::new`].
    pub fn with_reducer(options: Options, reducer: Reducer) -> Self {
        Self::with_optional_reducer(options, Some(reducer))
    }

    fn with_optional_reducer(options: Options, reducer: Option<Reducer>) -> Self {
        assert!(
            options.max_zoom <= 30,
            "max_zoom must be at most 30, got {}",
            options.max_zoom
        );
        assert!(
            options.min_zoom <= options.max_zoom,
            "min_zoom ({}) must not exceed max_zoom ({})",
            options.min_zoom,
            options.max_zoom
        );

        ClusterIndex {
            options,
            reducer,
            levels: Vec::new(),
            points: Vec::new(),
            cluster_props: Vec::new(),
        }
    }

    /// The configuration this index was created with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The features passed to the last [`load`](Self::load), in input order.
    pub fn points(&self) -> &[Feature] {
        &self.points
    }

    /// Load a feature set, clustering it at every zoom level.
    ///
    /// Replaces whatever was loaded before. Features without usable point
    /// geometry are skipped. The rebuilt level chain is swapped in only
    /// after every level is complete, so queries never observe a partial
    /// load.
    pub fn load(&mut self, features: Vec<Feature>) -> Result<&mut Self> {
        let started = Instant::now();
        let min_zoom = self.options.min_zoom;
        let max_zoom = self.options.max_zoom;
        let node_size = self.options.node_size;

        // One record per feature with point geometry, projected onto the
        // unit square. Skipped features still occupy their input index so
        // cluster ids stay offset past the whole input.
        let mut entries = Vec::with_capacity(features.len());

        for (i, feature) in features.iter().enumerate() {
            let Some((lng, lat)) = point_coordinates(feature) else {
                debug!("skipping feature {i} without point geometry");
                continue;
            };

            entries.push(PointEntry {
                x: lng_x(lng),
                y: lat_y(lat),
                last_zoom: None,
                id: i,
                parent: None,
                count: 1,
                props: None,
            });
        }

        let mut cluster_props = Vec::new();
        let mut levels: Vec<Option<Level>> = vec![None; max_zoom as usize + 2];

        // Index the raw points, then derive each coarser level from the one
        // above it.
        let mut current = Level::build(entries, node_size)?;

        for zoom in (min_zoom..=max_zoom).rev() {
            let merged = cluster_level(
                &self.options,
                self.reducer.as_ref(),
                &features,
                &mut cluster_props,
                &mut current,
                zoom,
            );
            let next = Level::build(merged, node_size)?;

            trace!("z{zoom}: {} records", next.entries.len());

            levels[zoom as usize + 1] = Some(std::mem::replace(&mut current, next));
        }

        levels[min_zoom as usize] = Some(current);

        debug!(
            "loaded {} features across {} zoom levels in {:?}",
            features.len(),
            max_zoom - min_zoom + 2,
            started.elapsed()
        );

        self.points = features;
        self.levels = levels;
        self.cluster_props = cluster_props;

        Ok(self)
    }

    /// Retrieve the clusters and single features within a bounding box at a
    /// zoom level.
    ///
    /// `bbox` is `[min_lng, min_lat, max_lng, max_lat]` in degrees; boxes
    /// crossing the antimeridian are handled by querying each hemisphere.
    /// `zoom` is clamped to the configured range, with `max_zoom + 1`
    /// addressing the unclustered points.
    ///
    /// # Errors
    ///
    /// [`Error::NotLoaded`] if no features have been loaded.
    pub fn get_clusters(&self, bbox: [f64; 4], zoom: u8) -> Result<Vec<Feature>> {
        let mut min_lng = wrap_longitude(bbox[0]);
        let min_lat = bbox[1].min(90.0).max(-90.0);
        let mut max_lng = if bbox[2] == 180.0 {
            180.0
        } else {
            wrap_longitude(bbox[2])
        };
        let max_lat = bbox[3].min(90.0).max(-90.0);

        if bbox[2] - bbox[0] >= 360.0 {
            min_lng = -180.0;
            max_lng = 180.0;
        } else if min_lng > max_lng {
            let mut eastern = self.get_clusters([min_lng, min_lat, 180.0, max_lat], zoom)?;
            let western = self.get_clusters([-180.0, min_lat, max_lng, max_lat], zoom)?;

            eastern.extend(western);
            return Ok(eastern);
        }

        let level = self.level(self.limit_zoom(zoom))?;
        let ids = level.tree.range(
            lng_x(min_lng),
            lat_y(max_lat),
            lng_x(max_lng),
            lat_y(min_lat),
        );

        let mut clusters = Vec::with_capacity(ids.len());

        for id in ids {
            let entry = &level.entries[id];

            clusters.push(if entry.count > 1 {
                cluster_feature(entry, &self.cluster_props)
            } else {
                self.points[entry.id].clone()
            });
        }

        Ok(clusters)
    }

    /// Retrieve the children of a cluster on the next zoom level.
    ///
    /// # Errors
    ///
    /// [`Error::ClusterNotFound`] if the id does not decode to an existing
    /// cluster.
    pub fn get_children(&self, cluster_id: usize) -> Result<Vec<Feature>> {
        let (origin_slot, origin_zoom) = self.decode_cluster_id(cluster_id)?;

        let level = self
            .levels
            .get(origin_zoom)
            .and_then(Option::as_ref)
            .ok_or(Error::ClusterNotFound(cluster_id))?;
        let origin = level
            .entries
            .get(origin_slot)
            .copied()
            .ok_or(Error::ClusterNotFound(cluster_id))?;

        // Children sit within the radius the cluster was built with.
        let r = self.options.radius / (self.options.extent * 2.0_f64.powi(origin_zoom as i32 - 1));
        let ids = level.tree.within(origin.x, origin.y, r);

        let mut children = Vec::new();

        for id in ids {
            let entry = &level.entries[id];

            if entry.parent == Some(cluster_id) {
                children.push(if entry.count > 1 {
                    cluster_feature(entry, &self.cluster_props)
                } else {
                    self.points[entry.id].clone()
                });
            }
        }

        if children.is_empty() {
            return Err(Error::ClusterNotFound(cluster_id));
        }

        Ok(children)
    }

    /// Retrieve up to `limit` leaf features of a cluster, skipping the first
    /// `offset`.
    ///
    /// Child clusters are expanded in place, so the result contains original
    /// input features only, in hierarchy order.
    ///
    /// # Errors
    ///
    /// [`Error::ClusterNotFound`] if the id does not decode to an existing
    /// cluster.
    pub fn get_leaves(
        &self,
        cluster_id: usize,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Feature>> {
        let mut leaves = Vec::new();

        self.append_leaves(&mut leaves, cluster_id, limit, offset, 0)?;

        Ok(leaves)
    }

    /// The lowest zoom at which a cluster splits into more than one child.
    ///
    /// # Errors
    ///
    /// [`Error::ClusterNotFound`] if the id does not decode to an existing
    /// cluster.
    pub fn get_cluster_expansion_zoom(&self, cluster_id: usize) -> Result<usize> {
        let mut cluster_id = cluster_id;
        let (_, origin_zoom) = self.decode_cluster_id(cluster_id)?;
        let mut expansion_zoom = origin_zoom.saturating_sub(1);

        while expansion_zoom <= self.options.max_zoom as usize {
            let children = self.get_children(cluster_id)?;

            expansion_zoom += 1;

            if children.len() != 1 {
                break;
            }

            match cluster_meta(&children[0]) {
                Some((child_id, _)) => cluster_id = child_id,
                // A lone non-cluster child cannot split further.
                None => break,
            }
        }

        Ok(expansion_zoom)
    }

    /// Retrieve the features of a tile in tile-local pixel space, or `None`
    /// for an empty tile.
    ///
    /// The query box is padded by the cluster radius, and features are
    /// replicated across the antimeridian for tiles on the world's edge.
    ///
    /// # Errors
    ///
    /// [`Error::NotLoaded`] if no features have been loaded.
    pub fn get_tile(&self, z: u8, x: u32, y: u32) -> Result<Option<Tile>> {
        let level = self.level(self.limit_zoom(z))?;
        let z2 = 2.0_f64.powi(z as i32);
        let p = self.options.radius / self.options.extent;
        let xf = x as f64;
        let yf = y as f64;
        let top = (yf - p) / z2;
        let bottom = (yf + 1.0 + p) / z2;

        let mut features = Vec::new();

        let ids = level
            .tree
            .range((xf - p) / z2, top, (xf + 1.0 + p) / z2, bottom);
        self.add_tile_features(level, &ids, xf, yf, z2, &mut features);

        if x == 0 {
            let ids = level.tree.range(1.0 - p / z2, top, 1.0, bottom);
            self.add_tile_features(level, &ids, z2, yf, z2, &mut features);
        }
        if xf == z2 - 1.0 {
            let ids = level.tree.range(0.0, top, p / z2, bottom);
            self.add_tile_features(level, &ids, -1.0, yf, z2, &mut features);
        }

        Ok(if features.is_empty() {
            None
        } else {
            Some(Tile { features })
        })
    }

    /// Collect leaves depth-first, counting skipped ones across the whole
    /// descent.
    fn append_leaves(
        &self,
        result: &mut Vec<Feature>,
        cluster_id: usize,
        limit: usize,
        offset: usize,
        mut skipped: usize,
    ) -> Result<usize> {
        for child in self.get_children(cluster_id)? {
            match cluster_meta(&child) {
                Some((child_id, count)) => {
                    if skipped + count <= offset {
                        // The whole cluster falls before the requested page.
                        skipped += count;
                    } else {
                        skipped = self.append_leaves(result, child_id, limit, offset, skipped)?;
                    }
                }
                None => {
                    if skipped < offset {
                        skipped += 1;
                    } else {
                        result.push(child);
                    }
                }
            }

            if result.len() == limit {
                break;
            }
        }

        Ok(skipped)
    }

    fn add_tile_features(
        &self,
        level: &Level,
        ids: &[usize],
        x: f64,
        y: f64,
        z2: f64,
        features: &mut Vec<Feature>,
    ) {
        let extent = self.options.extent;

        for &i in ids {
            let entry = &level.entries[i];
            let is_cluster = entry.count > 1;

            let (px, py, properties) = if is_cluster {
                (
                    entry.x,
                    entry.y,
                    cluster_properties(entry, &self.cluster_props),
                )
            } else {
                let point = &self.points[entry.id];
                let Some((lng, lat)) = point_coordinates(point) else {
                    continue;
                };

                (
                    lng_x(lng),
                    lat_y(lat),
                    point.properties.clone().unwrap_or_default(),
                )
            };

            let id = if is_cluster || self.options.generate_id {
                Some(Id::Number(entry.id.into()))
            } else {
                self.points[entry.id].id.clone()
            };

            features.push(Feature {
                bbox: None,
                id,
                properties: Some(properties),
                geometry: Some(Geometry::new(Value::Point(vec![
                    (extent * (px * z2 - x)).round(),
                    (extent * (py * z2 - y)).round(),
                ]))),
                foreign_members: None,
            });
        }
    }

    /// Clamp a requested zoom into the built range, `max_zoom + 1` holding
    /// the unclustered points.
    fn limit_zoom(&self, zoom: u8) -> usize {
        (zoom as usize)
            .max(self.options.min_zoom as usize)
            .min(self.options.max_zoom as usize + 1)
    }

    fn level(&self, zoom: usize) -> Result<&Level> {
        self.levels
            .get(zoom)
            .and_then(Option::as_ref)
            .ok_or(Error::NotLoaded)
    }

    /// Split a synthesized cluster id into its origin buffer slot and origin
    /// zoom level.
    fn decode_cluster_id(&self, cluster_id: usize) -> Result<(usize, usize)> {
        let internal = cluster_id
            .checked_sub(self.points.len())
            .ok_or(Error::ClusterNotFound(cluster_id))?;

        Ok((internal >> 5, internal % 32))
    }
}

impl fmt::Debug for ClusterIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterIndex")
            .field("options", &self.options)
            .field("points", &self.points.len())
            .field("loaded", &!self.levels.is_empty())
            .finish_non_exhaustive()
    }
}

/// One merge pass: absorb each record's unprocessed neighbors at `zoom`,
/// returning the records of the next coarser level.
///
/// Records that merge leave their parent id behind in the finer level;
/// records that do not are carried over unchanged.
fn cluster_level(
    options: &Options,
    reducer: Option<&Reducer>,
    points: &[Feature],
    cluster_props: &mut Vec<JsonObject>,
    level: &mut Level,
    zoom: u8,
) -> Vec<PointEntry> {
    let r = options.radius / (options.extent * 2.0_f64.powi(zoom as i32));
    let Level { tree, entries } = level;
    let mut next = Vec::new();

    for i in 0..entries.len() {
        if entries[i].processed_at(zoom) {
            continue;
        }
        entries[i].last_zoom = Some(zoom);

        let origin = entries[i];
        let neighbor_ids = tree.within(origin.x, origin.y, r);

        let mut count = origin.count;
        for &n in &neighbor_ids {
            if !entries[n].processed_at(zoom) {
                count += entries[n].count;
            }
        }

        // Merge only when neighbors actually joined and the total clears the
        // minimum cluster size.
        if count > origin.count && count >= options.min_points as usize {
            let mut wx = origin.x * origin.count as f64;
            let mut wy = origin.y * origin.count as f64;
            let mut props_slot = None;

            // Encode the origin slot and zoom, offset past the feature
            // indices so the two id spaces never collide.
            let id = (i << 5) + (zoom as usize + 1) + points.len();

            for &n in &neighbor_ids {
                if entries[n].processed_at(zoom) {
                    continue;
                }
                entries[n].last_zoom = Some(zoom);

                let neighbor = entries[n];
                wx += neighbor.x * neighbor.count as f64;
                wy += neighbor.y * neighbor.count as f64;
                entries[n].parent = Some(id);

                if let Some(reducer) = reducer {
                    let slot = match props_slot {
                        Some(slot) => slot,
                        None => {
                            let seed = mapped_properties(&origin, points, reducer, cluster_props);

                            cluster_props.push(seed);
                            props_slot = Some(cluster_props.len() - 1);
                            cluster_props.len() - 1
                        }
                    };
                    let mapped = mapped_properties(&neighbor, points, reducer, cluster_props);

                    (reducer.reduce)(&mut cluster_props[slot], &mapped);
                }
            }

            entries[i].parent = Some(id);

            next.push(PointEntry {
                x: wx / count as f64,
                y: wy / count as f64,
                last_zoom: None,
                id,
                parent: None,
                count,
                props: props_slot,
            });
        } else {
            next.push(entries[i]);

            // A failed merge still claims its unprocessed neighbors for this
            // zoom so each is carried over exactly once.
            if count > 1 {
                for &n in &neighbor_ids {
                    if entries[n].processed_at(zoom) {
                        continue;
                    }
                    entries[n].last_zoom = Some(zoom);
                    next.push(entries[n]);
                }
            }
        }
    }

    next
}

/// The reducer's view of one record: aggregates reuse their accumulated
/// table slot, single points map their original feature properties.
fn mapped_properties(
    entry: &PointEntry,
    points: &[Feature],
    reducer: &Reducer,
    cluster_props: &[JsonObject],
) -> JsonObject {
    if entry.count > 1 {
        return entry
            .props
            .and_then(|slot| cluster_props.get(slot).cloned())
            .unwrap_or_default();
    }

    match &points[entry.id].properties {
        Some(properties) => (reducer.map)(properties),
        None => (reducer.map)(&JsonObject::new()),
    }
}

/// Build the output feature for an aggregate record, centroid converted back
/// to degrees.
fn cluster_feature(entry: &PointEntry, cluster_props: &[JsonObject]) -> Feature {
    Feature {
        bbox: None,
        id: Some(Id::Number(entry.id.into())),
        properties: Some(cluster_properties(entry, cluster_props)),
        geometry: Some(Geometry::new(Value::Point(vec![
            x_lng(entry.x),
            y_lat(entry.y),
        ]))),
        foreign_members: None,
    }
}

fn cluster_properties(entry: &PointEntry, cluster_props: &[JsonObject]) -> JsonObject {
    let mut properties = entry
        .props
        .and_then(|slot| cluster_props.get(slot).cloned())
        .unwrap_or_default();

    properties.insert("cluster".to_string(), JsonValue::Bool(true));
    properties.insert("cluster_id".to_string(), JsonValue::from(entry.id));
    properties.insert("point_count".to_string(), JsonValue::from(entry.count));
    properties.insert(
        "point_count_abbreviated".to_string(),
        abbreviated_count(entry.count),
    );

    properties
}

/// Read the cluster id and point count of a feature, if it is a cluster.
fn cluster_meta(feature: &Feature) -> Option<(usize, usize)> {
    let properties = feature.properties.as_ref()?;

    if !properties
        .get("cluster")
        .and_then(JsonValue::as_bool)
        .unwrap_or(false)
    {
        return None;
    }

    let id = properties.get("cluster_id")?.as_u64()? as usize;
    let count = properties.get("point_count")?.as_u64()? as usize;

    Some((id, count))
}

/// Display form of a point count: numeric under 1000, "1.2k" under 10000,
/// "12k" beyond.
fn abbreviated_count(count: usize) -> JsonValue {
    if count >= 10000 {
        JsonValue::from(format!("{}k", (count as f64 / 1000.0).round()))
    } else if count >= 1000 {
        JsonValue::from(format!("{}k", (count as f64 / 100.0).round() / 10.0))
    } else {
        JsonValue::from(count)
    }
}

/// The longitude and latitude of a feature's point geometry, if it has one.
fn point_coordinates(feature: &Feature) -> Option<(f64, f64)> {
    match &feature.geometry {
        Some(Geometry {
            value: Value::Point(coordinates),
            ..
        }) if coordinates.len() >= 2 => Some((coordinates[0], coordinates[1])),
        _ => None,
    }
}

/// Wrap a longitude into [-180, 180).
fn wrap_longitude(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

/// Longitude to x on the spherical-Mercator unit square.
fn lng_x(lng: f64) -> f64 {
    lng / 360.0 + 0.5
}

/// Latitude to y on the spherical-Mercator unit square, clamped at the
/// projection poles.
fn lat_y(lat: f64) -> f64 {
    let sin = lat.to_radians().sin();
    let y = 0.5 - (0.25 * ((1.0 + sin) / (1.0 - sin)).ln()) / PI;

    if y < 0.0 {
        0.0
    } else if y > 1.0 {
        1.0
    } else {
        y
    }
}

/// Unit-square x back to longitude.
fn x_lng(x: f64) -> f64 {
    (x - 0.5) * 360.0
}

/// Unit-square y back to latitude.
fn y_lat(y: f64) -> f64 {
    let y2 = ((180.0 - y * 360.0) * PI) / 180.0;
    (360.0 * y2.exp().atan()) / PI - 90.0
}

//! Tour evaluator that computes load, timing, and feasibility.

use crate::models::{Instance, Stop, Tour, Violation, ViolationType};

/// Aggregates of one depot-to-depot tour.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TourMetrics {
    pub stops: usize,
    pub load: u64,
    pub weight: f64,
    pub volume: f64,
    /// Depot-to-depot distance in km.
    pub distance: f64,
    /// Travel plus service time in minutes.
    pub duration: f64,
}

/// A tour under construction, closed implicitly at the depot.
///
/// Used by the split procedures to test whether one more stop still fits.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenTour {
    stops: usize,
    load: u64,
    weight: f64,
    volume: f64,
    open_distance: f64,
    last: Option<usize>,
}

impl OpenTour {
    pub fn is_empty(&self) -> bool {
        self.stops == 0
    }

    fn leg_to(&self, instance: &Instance<'_>, next: usize) -> f64 {
        match self.last {
            Some(last) => instance.distance(last, next),
            None => instance.depot_distance(next),
        }
    }

    /// Metrics of this tour extended by `next` and closed at the depot.
    pub fn projected(&self, instance: &Instance<'_>, next: usize) -> TourMetrics {
        let mut extended = *self;
        extended.push(instance, next);
        extended.close(instance)
    }

    /// Appends `next` to the tour.
    pub fn push(&mut self, instance: &Instance<'_>, next: usize) {
        self.open_distance += self.leg_to(instance, next);
        self.stops += 1;
        self.load += u64::from(instance.address(next).load());
        self.weight += instance.weight(next);
        self.volume += instance.volume(next);
        self.last = Some(next);
    }

    /// Metrics of the tour after returning to the depot.
    pub fn close(&self, instance: &Instance<'_>) -> TourMetrics {
        let distance = match self.last {
            Some(last) => self.open_distance + instance.depot_distance(last),
            None => 0.0,
        };
        TourMetrics {
            stops: self.stops,
            load: self.load,
            weight: self.weight,
            volume: self.volume,
            distance,
            duration: instance.cost_model().tour_duration(distance, self.stops),
        }
    }
}

/// Evaluates tours by computing cumulative load, distance, duration, and
/// checking every constraint of the vehicle profile.
///
/// # Examples
///
/// ```
/// use tour_ga::distance::CostModel;
/// use tour_ga::evaluation::TourEvaluator;
/// use tour_ga::models::{Address, Coordinates, Instance, VehicleConstraints};
///
/// let addresses = vec![
///     Address::new("A", Coordinates::new(48.14, 11.58), 30),
///     Address::new("B", Coordinates::new(48.15, 11.60), 30),
/// ];
/// let constraints = VehicleConstraints::default().with_max_load(50);
/// let inst = Instance::new(&addresses, Coordinates::new(48.1067, 11.4247), &constraints, CostModel::default());
///
/// let evaluator = TourEvaluator::new(&inst);
/// let tour = evaluator.build_tour(1, &[0, 1]);
/// assert_eq!(tour.len(), 2);
/// assert_eq!(tour.total_load(), 60);
/// assert!(!tour.is_feasible());
/// ```
pub struct TourEvaluator<'a> {
    instance: &'a Instance<'a>,
}

impl<'a> TourEvaluator<'a> {
    pub fn new(instance: &'a Instance<'a>) -> Self {
        Self { instance }
    }

    pub fn instance(&self) -> &'a Instance<'a> {
        self.instance
    }

    /// Aggregates of visiting `indices` in order from and back to the depot.
    pub fn measure(&self, indices: &[usize]) -> TourMetrics {
        let mut open = OpenTour::default();
        for &i in indices {
            open.push(self.instance, i);
        }
        open.close(self.instance)
    }

    /// Returns `true` if the metrics respect every tour-level limit.
    pub fn within_limits(&self, m: &TourMetrics) -> bool {
        let c = self.instance.constraints();
        m.load <= u64::from(c.max_load())
            && m.weight <= c.max_weight()
            && m.volume <= c.max_volume()
            && m.stops <= c.max_stops() as usize
            && m.duration <= c.max_duration()
            && c.max_tour_distance().map_or(true, |max| m.distance <= max)
    }

    /// Lists every constraint the tour `indices` (with metrics `m`) breaks.
    pub fn violations(&self, indices: &[usize], m: &TourMetrics) -> Vec<Violation> {
        let c = self.instance.constraints();
        let mut violations = Vec::new();

        if m.load > u64::from(c.max_load()) {
            let kind = match indices {
                [only] => ViolationType::InfeasibleStop {
                    address_id: self.instance.address(*only).id().to_string(),
                    load: m.load,
                    max_load: c.max_load(),
                },
                _ => ViolationType::LoadExceeded {
                    load: m.load,
                    max_load: c.max_load(),
                },
            };
            violations.push(Violation::new(kind));
        }
        if m.weight > c.max_weight() {
            violations.push(Violation::new(ViolationType::WeightExceeded {
                weight: m.weight,
                max_weight: c.max_weight(),
            }));
        }
        if m.volume > c.max_volume() {
            violations.push(Violation::new(ViolationType::VolumeExceeded {
                volume: m.volume,
                max_volume: c.max_volume(),
            }));
        }
        if m.stops > c.max_stops() as usize {
            violations.push(Violation::new(ViolationType::StopsExceeded {
                stops: u32::try_from(m.stops).unwrap_or(u32::MAX),
                max_stops: c.max_stops(),
            }));
        }
        if m.duration > c.max_duration() {
            violations.push(Violation::new(ViolationType::DurationExceeded {
                duration: m.duration,
                max_duration: c.max_duration(),
            }));
        }
        if let Some(max) = c.max_tour_distance() {
            if m.distance > max {
                violations.push(Violation::new(ViolationType::TourDistanceExceeded {
                    distance: m.distance,
                    max_distance: max,
                }));
            }
        }
        for &i in indices {
            if self.instance.is_restricted(i) {
                violations.push(Violation::new(ViolationType::RestrictedArea {
                    address_id: self.instance.address(i).id().to_string(),
                }));
            }
        }

        violations
    }

    /// Materializes tour number `id` from `indices`, with per-stop timing,
    /// cumulative load, aggregates, and violations.
    pub fn build_tour(&self, id: usize, indices: &[usize]) -> Tour {
        let cost = self.instance.cost_model();
        let mut tour = Tour::new(id);
        let mut open = OpenTour::default();
        let mut clock = 0.0;

        for (pos, &i) in indices.iter().enumerate() {
            let leg = open.leg_to(self.instance, i);
            clock += cost.travel_minutes(leg);
            open.push(self.instance, i);
            tour.push_stop(
                Stop {
                    address: self.instance.address(i).clone(),
                    stop_order: pos + 1,
                    arrival_minutes: clock,
                    load_after: open.load,
                    leg_distance: leg,
                },
                i,
            );
            clock += cost.service_minutes_per_stop();
        }

        let metrics = open.close(self.instance);
        tour.set_measures(metrics.weight, metrics.volume);
        tour.set_estimates(metrics.distance, metrics.duration);
        tour.set_violations(self.violations(indices, &metrics));
        tour
    }
}

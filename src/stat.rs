use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub costs: usize,
    pub time_micros: usize,
    pub nodes_expanded: usize,
    pub nodes_generated: usize,
    pub max_frontier: usize,
}

impl Stats {
    pub fn print(&self) {
        info!(
            "Cost {:?} Time(microseconds) {:?} Expanded nodes: {:?} Generated nodes: {:?} Peak frontier: {:?}",
            self.costs, self.time_micros, self.nodes_expanded, self.nodes_generated, self.max_frontier
        );
    }
}

// Prometheus text exposition of one resolution pass

use crate::models::InterfaceReport;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

pub const LABELS: [&str; 7] = [
    "interface",
    "instance",
    "instance_type",
    "app",
    "bridge",
    "vlan",
    "state",
];

/// Counter families, one per net/dev column we export.
struct InterfaceCounterVecs {
    rx_bytes: IntCounterVec,
    tx_bytes: IntCounterVec,
    rx_packets: IntCounterVec,
    tx_packets: IntCounterVec,
    rx_errors: IntCounterVec,
    tx_errors: IntCounterVec,
    rx_dropped: IntCounterVec,
    tx_dropped: IntCounterVec,
}

impl InterfaceCounterVecs {
    fn register(registry: &Registry) -> prometheus::Result<Self> {
        let counter = |name: &str, help: &str| -> prometheus::Result<IntCounterVec> {
            let vec = IntCounterVec::new(Opts::new(name, help), &LABELS)?;
            registry.register(Box::new(vec.clone()))?;
            Ok(vec)
        };
        Ok(Self {
            rx_bytes: counter(
                "net_interface_rx_bytes_total",
                "Total bytes received on this interface.",
            )?,
            tx_bytes: counter(
                "net_interface_tx_bytes_total",
                "Total bytes transmitted on this interface.",
            )?,
            rx_packets: counter(
                "net_interface_rx_packets_total",
                "Total packets received on this interface.",
            )?,
            tx_packets: counter(
                "net_interface_tx_packets_total",
                "Total packets transmitted on this interface.",
            )?,
            rx_errors: counter(
                "net_interface_rx_errors_total",
                "Total receive errors on this interface.",
            )?,
            tx_errors: counter(
                "net_interface_tx_errors_total",
                "Total transmit errors on this interface.",
            )?,
            rx_dropped: counter(
                "net_interface_rx_dropped_total",
                "Total received packets dropped on this interface.",
            )?,
            tx_dropped: counter(
                "net_interface_tx_dropped_total",
                "Total transmitted packets dropped on this interface.",
            )?,
        })
    }

    fn observe(&self, report: &InterfaceReport) -> prometheus::Result<()> {
        let info = &report.info;
        let labels = [
            info.name.as_str(),
            info.instance.as_str(),
            info.instance_type.as_str(),
            info.app.as_str(),
            info.bridge.as_str(),
            info.vlan.as_str(),
            info.state.as_str(),
        ];
        let c = &report.counters;
        for (vec, value) in [
            (&self.rx_bytes, c.rx_bytes),
            (&self.tx_bytes, c.tx_bytes),
            (&self.rx_packets, c.rx_packets),
            (&self.tx_packets, c.tx_packets),
            (&self.rx_errors, c.rx_errors),
            (&self.tx_errors, c.tx_errors),
            (&self.rx_dropped, c.rx_dropped),
            (&self.tx_dropped, c.tx_dropped),
        ] {
            vec.get_metric_with_label_values(&labels)?.inc_by(value);
        }
        Ok(())
    }
}

/// Render a pass as Prometheus text, together with the exporter's own process metrics.
/// A fresh registry per call keeps scrapes isolated: the counters carry the kernel's
/// cumulative values, not deltas.
pub fn render(reports: &[InterfaceReport]) -> anyhow::Result<String> {
    let registry = Registry::new();
    #[cfg(target_os = "linux")]
    registry.register(Box::new(
        prometheus::process_collector::ProcessCollector::for_self(),
    ))?;
    let vecs = InterfaceCounterVecs::register(&registry)?;
    for report in reports {
        vecs.observe(report)?;
    }
    let mut buf = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

//! Constantes del motor de evaluación.

/// Versión del formato del reporte agregado. Los consumidores (renderers)
/// pueden usarla para detectar cambios incompatibles en su forma.
pub const REPORT_FORMAT_VERSION: &str = "1.0";

/// Nombre del pass de recolección por defecto (los collectors agrupan los
/// logs de protocolo por pass).
pub const DEFAULT_PASS: &str = "defaultPass";

// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
//
// Logik-Konstanten (LED_COUNT, PWM_STEP, TICK_INTERVAL_MS, ...) liegen in
// globe_core::config. Hier steht nur, was an Board und Netzwerk hängt.

// ============================================================================
// LED-Strip Konfiguration
// ============================================================================

/// GPIO-Pin für die Datenleitung des LED-Strips (WS2812/Neopixel)
pub const LED_GPIO_PIN: u8 = 8;

/// Helligkeits-Skalierung für den Strip (0-255, 255 = volle Helligkeit)
/// Die Farben aus globe_core werden beim Schreiben damit skaliert
pub const LED_BRIGHTNESS: u8 = 26;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

// ============================================================================
// PWM- und Status-Ausgang
// ============================================================================

/// GPIO-Pin für den PWM-Ausgang (Motor-/Lampentreiber)
pub const PWM_GPIO_PIN: u8 = 4;

/// PWM-Frequenz in kHz
/// 1 kHz liegt unter der Grenze für 14 Bit Auflösung bei 80 MHz APB
pub const PWM_FREQUENCY_KHZ: u32 = 1;

/// GPIO-Pin für die Status-LED (leuchtet bei Tastendruck)
pub const INDICATOR_GPIO_PIN: u8 = 5;

// ============================================================================
// Controller-Loop
// ============================================================================

/// Pause zwischen zwei Controller-Durchläufen in Millisekunden
/// Deutlich kürzer als TICK_INTERVAL_MS, damit Tasten sofort reagieren
pub const POLL_INTERVAL_MS: u64 = 10;

/// Anzahl Frames, die zwischen WebSocket und Controller gepuffert werden
pub const FRAME_QUEUE_DEPTH: usize = 8;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Setze diese in .env file
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file mit WIFI_SSID"
);

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file mit WIFI_PASSWORD"
);

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

/// Wartezeit nach WiFi-Fehler vor erneutem Versuch
pub const WIFI_RETRY_DELAY_SECS: u64 = 5;

// ============================================================================
// mDNS-Konfiguration
// ============================================================================

/// mDNS Hostname (ohne .local suffix)
/// Der Globus ist erreichbar unter: globe.local
pub const MDNS_HOSTNAME: &str = "globe";

/// mDNS TTL (Time To Live) in Sekunden
pub const MDNS_TTL_SECS: u32 = 120;

/// Wartezeit nach mDNS-Fehler vor erneutem Versuch
pub const MDNS_RECONNECT_DELAY_SECS: u64 = 5;

/// mDNS Port laut RFC 6762
pub const MDNS_PORT: u16 = 5353;

/// mDNS IPv4 Multicast-Gruppe laut RFC 6762
pub const MDNS_MULTICAST_ADDR: [u8; 4] = [224, 0, 0, 251];

/// UDP Buffer-Größen für mDNS (TX, RX in Bytes)
pub const MDNS_UDP_BUFFER_SIZE: usize = 512;

/// mDNS Packet Buffer-Größe (1500 Bytes = Standard MTU)
pub const MDNS_PACKET_BUFFER_SIZE: usize = 1500;

// ============================================================================
// HTTP Server Konfiguration
// ============================================================================

/// TCP Port des HTTP-Servers
pub const HTTP_PORT: u16 = 80;

/// Anzahl paralleler HTTP-Server-Tasks
/// Muss zu `pool_size` in tasks/http.rs passen (Seite + Session + ein 503)
pub const HTTP_TASK_COUNT: usize = 3;

/// HTTP Buffer-Größe in Bytes
pub const HTTP_BUFFER_SIZE: usize = 1024;

/// TCP RX Buffer-Größe in Bytes
pub const TCP_RX_BUFFER_SIZE: usize = 1024;

/// TCP TX Buffer-Größe in Bytes
pub const TCP_TX_BUFFER_SIZE: usize = 1024;

/// WebSocket Message Buffer-Größe in Bytes
/// Bluefruit-Frames sind höchstens 19 Bytes lang
pub const WEBSOCKET_BUFFER_SIZE: usize = 128;

/// JSON Serialisierungs-Buffer für Server-Nachrichten
/// Für {"type":"status","rgb":{...},"duty":65535,"step":64,"ramp":"RampDown","connected":true}
pub const JSON_BUFFER_SIZE: usize = 160;

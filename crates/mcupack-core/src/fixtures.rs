//! XML fixtures shared by the unit tests.

pub const MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package schemaVersion="1.4" xmlns:at="http://www.atmel.com/schemas/pack-device-atmel-extension">
  <vendor>Microchip</vendor>
  <name>ATmega_DFP</name>
  <description>Microchip ATmega Series Device Support</description>
  <url>http://packs.download.microchip.com/</url>
  <releases>
    <release version="3.1.264" date="2024-03-01">Current</release>
    <release version="3.0.158">Older</release>
  </releases>
  <pinouts>
    <pinout name="PDIP28" caption="28-pin PDIP" pins="28"/>
    <pinout name="TQFP32" caption="32-pin TQFP" pins="32"/>
  </pinouts>
  <devices>
    <family Dfamily="megaAVR" Dvendor="Microchip:3">
      <book name="https://example.com/avr-instruction-set.pdf" title="AVR Instruction Set Manual"/>
      <device Dname="ATmega328P">
        <processor Dcore="AVR8" Dclock="20000000"/>
        <memory name="progmem" type="flash" start="0x0000" size="0x8000"/>
        <memory id="IRAM1" start="0x100" size="2048"/>
        <memory name="EEPROM" start="0" size="0x400"/>
        <book name="https://example.com/328p.pdf" title="ATmega328P Data Sheet"/>
        <book name="https://example.com/328p" title="ATmega328P Device Page"/>
        <book name="https://example.com/an1.pdf" title="AN2519 Application Note"/>
        <environment name="atmel">
          <at:extension>
            <at:atdf name="atdf/ATmega328P.atdf"/>
            <at:interface name="ISP" type="isp"/>
            <at:interface name="debugWIRE" type="dw"/>
            <at:variant ordercode="ATmega328P-PU" package="PDIP" pinout="PDIP28" temprange="-40 - 85" vccrange="1.8-5.5" speedmax="20000000"/>
            <at:variant ordercode="ATmega328P-AU" package="TQFP" pinout="QFN99" temprange="[-40, 105]" vccrange="2.7 to 5.5"/>
          </at:extension>
        </environment>
      </device>
      <subFamily DsubFamily="tiny">
        <device Dname="ATtiny10">
          <processor Dcore="AVR8L"/>
          <memory name="FLASH" start="0" size="1024"/>
        </device>
      </subFamily>
    </family>
    <family Dfamily="PIC16">
      <device Dname="PIC16F877A">
        <processor Dcore="16xxxx"/>
        <memory name="FLASH" start="0" size="0x2000"/>
        <environment name="atmel">
          <at:extension><at:edc name="edc/PIC16F877A.PIC"/></at:extension>
        </environment>
      </device>
      <device Dname="Mystery1">
        <processor Dcore="Cortex-M0+"/>
      </device>
    </family>
  </devices>
</package>
"#;

pub const ATDF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<avr-tools-device-file xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" schema-version="4.0">
  <variants>
    <variant ordercode="ATmega328P-AU" package="TQFP32" pinout="TQFP32" speedmax="20000000" tempmin="-40" tempmax="85" vccmin="1.8" vccmax="5.5"/>
    <variant ordercode="ATmega328P-PU" package="PDIP28" pinout="PDIP28" speedmax="20000000" tempmin="-40" tempmax="105" vccmin="2.7" vccmax="5.5"/>
  </variants>
  <devices>
    <device name="ATmega328P" architecture="AVR8" family="megaAVR">
      <address-spaces>
        <address-space endianness="little" name="prog" id="prog" start="0x0000" size="0x8000">
          <memory-segment start="0x0000" size="0x8000" type="flash" rw="R" exec="1" name="FLASH" pagesize="0x80"/>
        </address-space>
        <address-space endianness="little" name="signatures" id="signatures" start="0" size="3"/>
        <address-space endianness="little" name="fuses" id="fuses" start="0" size="0x0003"/>
        <address-space endianness="little" name="lockbits" id="lockbits" start="0" size="0x0001"/>
        <address-space endianness="little" name="data" id="data" start="0x0000" size="0x0900">
          <memory-segment external="false" type="regs" size="0x0020" start="0x0000" name="REGISTERS"/>
          <memory-segment name="IO" start="0x0020" size="0x00e0" type="io" external="false"/>
          <memory-segment name="IRAM" start="0x0100" size="0x0800" type="ram" external="false"/>
        </address-space>
        <address-space endianness="little" name="eeprom" id="eeprom" start="0x0000" size="0x0400">
          <memory-segment start="0x0000" size="0x0400" type="eeprom" rw="RW" exec="0" name="EEPROM" pagesize="0x04"/>
        </address-space>
      </address-spaces>
      <peripherals>
        <module name="PORT">
          <instance name="PORTB" caption="I/O Port">
            <register-group name="PORTB" name-in-module="PORTB" offset="0x00" address-space="data"/>
            <signals>
              <signal group="P" function="default" pad="PB0" index="0"/>
              <signal group="P" function="default" pad="PB1" index="1"/>
            </signals>
          </instance>
        </module>
        <module name="TC8">
          <instance name="TC0" caption="Timer/Counter, 8-bit">
            <register-group name="TC0" name-in-module="TC0" offset="0x00" address-space="data"/>
          </instance>
        </module>
        <module name="TC16">
          <instance name="TC1" caption="Timer/Counter, 16-bit">
            <register-group name="TC1" name-in-module="TC1" offset="0x00" address-space="data"/>
            <signals>
              <signal group="ICP" function="default" pad="PB0"/>
            </signals>
          </instance>
        </module>
        <module name="USART">
          <instance name="USART0" caption="USART">
            <register-group name="USART0" name-in-module="USART0" offset="0x00" address-space="data"/>
            <signals>
              <signal group="RXD" function="default" pad="PD0"/>
              <signal group="TXD" function="default" pad="PD1"/>
            </signals>
          </instance>
        </module>
      </peripherals>
      <interrupts>
        <interrupt index="0" name="RESET" caption="External Pin, Power-on Reset, Brown-out Reset and Watchdog Reset"/>
        <interrupt index="1" name="INT0" caption="External Interrupt Request 0" module-instance="EXINT"/>
        <interrupt index="18" name="USART_RX" caption="USART Rx Complete" module-instance="USART0"/>
      </interrupts>
      <interfaces>
        <interface name="ISP" type="isp"/>
        <interface name="debugWIRE" type="dw"/>
      </interfaces>
      <property-groups>
        <property-group name="SIGNATURES">
          <property name="JTAGID" value="0x0950F03F"/>
          <property name="SIGNATURE2" value="0x0F"/>
          <property name="SIGNATURE0" value="0x1E"/>
          <property name="SIGNATURE1" value="0x95"/>
        </property-group>
        <property-group name="ELECTRICAL_CHARACTERISTICS">
          <property name="ABS_MAX_VCC" value="6.0"/>
        </property-group>
      </property-groups>
    </device>
  </devices>
  <modules>
    <module caption="Fuses" name="FUSE">
      <register-group caption="Fuses" name="FUSE">
        <register caption="" name="EXTENDED" offset="0x02" size="1">
          <bitfield caption="Brown-out Detector trigger level" mask="0x07" name="BODLEVEL" values="ENUM_BODLEVEL"/>
        </register>
        <register caption="" name="HIGH" offset="0x01" size="1">
          <bitfield caption="Reset Disabled" mask="0x80" name="RSTDISBL"/>
          <bitfield caption="Debug Wire enable" mask="0x40" name="DWEN"/>
          <bitfield caption="Serial program downloading enabled" mask="0x20" name="SPIEN"/>
          <bitfield caption="Watchdog Timer Always On" mask="0x10" name="WDTON"/>
          <bitfield caption="Preserve EEPROM through the Chip Erase cycle" mask="0x08" name="EESAVE"/>
          <bitfield caption="Select boot size" mask="0x06" name="BOOTSZ" values="ENUM_BOOTSZ"/>
          <bitfield caption="Boot Reset vector Enabled" mask="0x01" name="BOOTRST"/>
        </register>
        <register caption="" name="LOW" offset="0x00" size="1" initval="0x62">
          <bitfield caption="Divide clock by 8 internally" mask="0x80" name="CKDIV8"/>
          <bitfield caption="Clock output on PORTB0" mask="0x40" name="CKOUT"/>
          <bitfield caption="Select Clock Source" mask="0x3F" name="SUT_CKSEL" values="ENUM_SUT_CKSEL"/>
        </register>
      </register-group>
      <value-group caption="" name="ENUM_BODLEVEL">
        <value caption="Brown-out detection at VCC=4.3 V" name="4V3" value="0x04"/>
        <value caption="Brown-out detection at VCC=2.7 V" name="2V7" value="0x05"/>
        <value caption="Brown-out detection disabled" name="DISABLED" value="0x07"/>
      </value-group>
      <value-group caption="" name="ENUM_BOOTSZ">
        <value caption="Boot Flash size=256 words" name="256W_3F00" value="0x03"/>
        <value caption="Boot Flash size=2048 words" name="2048W_3800" value="0x00"/>
      </value-group>
      <value-group caption="" name="ENUM_SUT_CKSEL">
        <value caption="Ext. Clock; Start-up time PWRDWN/RESET: 6 CK/14 CK + 0 ms" name="EXTCLK_6CK_14CK_0MS" value="0x00"/>
        <value caption="Int. RC Osc. 8 MHz; Start-up time PWRDWN/RESET: 6 CK/14 CK + 65 ms" name="INTRCOSC_8MHZ_6CK_14CK_65MS" value="0x22"/>
      </value-group>
    </module>
    <module caption="Lockbits" name="LOCKBIT">
      <register-group caption="Lockbits" name="LOCKBIT">
        <register caption="" name="LOCKBIT" offset="0x00" size="1">
          <bitfield caption="Memory Lock" mask="0x03" name="LB" values="ENUM_LB"/>
          <bitfield caption="Boot Loader Protection Mode" mask="0x0C" name="BLB0"/>
          <bitfield caption="Boot Loader Protection Mode" mask="0x30" name="BLB1"/>
        </register>
      </register-group>
      <value-group caption="" name="ENUM_LB">
        <value caption="Further programming and verification disabled" name="PROG_VER_DISABLED" value="0x00"/>
        <value caption="No memory lock features enabled" name="NO_LOCK" value="0x03"/>
      </value-group>
    </module>
    <module caption="CPU Registers" name="CPU">
      <register-group caption="CPU Registers" name="CPU">
        <register caption="Clock Prescale Register" name="CLKPR" offset="0x61" size="1" mask="0x8F">
          <bitfield caption="Clock Prescaler Change Enable" mask="0x80" name="CLKPCE"/>
          <bitfield caption="Clock Prescaler Select Bits" mask="0x0F" name="CLKPS" values="CPU_CLK_PRESCALE_4_BITS_SMALL"/>
        </register>
      </register-group>
      <value-group caption="" name="CPU_CLK_PRESCALE_4_BITS_SMALL">
        <value caption="1" name="VAL_0x00" value="0x00"/>
        <value caption="2" name="VAL_0x01" value="0x01"/>
        <value caption="4" name="VAL_0x02" value="0x02"/>
        <value caption="8" name="VAL_0x03" value="0x03"/>
      </value-group>
    </module>
    <module caption="I/O Port" name="PORT">
      <register-group caption="I/O Port" name="PORTB">
        <register caption="Port B Data Register" name="PORTB" offset="0x25" size="1" mask="0xFF"/>
      </register-group>
    </module>
    <module caption="Timer/Counter, 8-bit" name="TC8">
      <register-group caption="Timer/Counter, 8-bit" name="TC0">
        <register caption="Timer/Counter0 Control Register A" name="TCCR0A" offset="0x44" size="1">
          <bitfield caption="Force Output Compare A" mask="0xC0" name="COM0A"/>
          <bitfield caption="Waveform Generation Mode" mask="0x03" name="WGM0"/>
        </register>
        <register caption="Timer/Counter0 Control Register B" name="TCCR0B" offset="0x45" size="1">
          <bitfield caption="" mask="0x08" name="WGM02"/>
          <bitfield caption="Clock Select" mask="0x07" name="CS0" values="CLK_SEL_3BIT_EXT"/>
        </register>
        <register caption="Timer/Counter0" name="TCNT0" offset="0x46" size="1" mask="0xFF"/>
      </register-group>
      <value-group caption="" name="CLK_SEL_3BIT_EXT">
        <value caption="No Clock Source (Stopped)" name="VAL_0x00" value="0x00"/>
        <value caption="Running, No Prescaling" name="VAL_0x01" value="0x01"/>
        <value caption="Running, CLK/8" name="VAL_0x02" value="0x02"/>
        <value caption="Running, CLK/64" name="VAL_0x03" value="0x03"/>
        <value caption="Running, CLK/256" name="VAL_0x04" value="0x04"/>
        <value caption="Running, CLK/1024" name="VAL_0x05" value="0x05"/>
        <value caption="Running, ExtClk Tx Falling Edge" name="VAL_0x06" value="0x06"/>
        <value caption="Running, ExtClk Tx Rising Edge" name="VAL_0x07" value="0x07"/>
      </value-group>
    </module>
    <module caption="Timer/Counter, 16-bit" name="TC16">
      <register-group caption="Timer/Counter, 16-bit" name="TC1">
        <register caption="Timer/Counter1 Control Register A" name="TCCR1A" offset="0x80" size="1">
          <bitfield caption="Waveform Generation Mode" mask="0x03" name="WGM1" values="WGM_MODES"/>
        </register>
        <register caption="Timer/Counter1 Control Register B" name="TCCR1B" offset="0x81" size="1">
          <bitfield caption="Prescaler source of Timer/Counter 1" mask="0x07" name="CS1"/>
        </register>
      </register-group>
      <value-group caption="" name="WGM_MODES">
        <value caption="Normal" name="NORMAL" value="0x00"/>
        <value caption="PWM, Phase Correct, 8-bit" name="PWM_PC_8BIT" value="0x01"/>
      </value-group>
    </module>
    <module caption="USART" name="USART">
      <register-group caption="USART" name="USART0">
        <register caption="USART Baud Rate Register High Byte" name="UBRR0H" offset="0xC5" size="1">
          <bitfield caption="Baud Rate High Bits" mask="0x0F00" name="UBRR"/>
        </register>
      </register-group>
    </module>
  </modules>
  <pinouts>
    <pinout name="PDIP28" caption="28-pin PDIP">
      <pin position="1" pad="PC6"/>
      <pin position="2" pad="PD0"/>
      <pin position="3" pad="PD1"/>
      <pin position="14" pad="PB0"/>
    </pinout>
  </pinouts>
</avr-tools-device-file>
"#;

pub const EDC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<edc:PIC xmlns:edc="http://crownking/edc" edc:name="PIC16F877A" edc:arch="16xxxx" edc:psid="877">
  <edc:ProgramSpace>
    <edc:CodeSector edc:beginaddr="0x0" edc:endaddr="0x2000"/>
    <edc:UserIDSector edc:beginaddr="0x2000" edc:endaddr="0x2004"/>
    <edc:DeviceIDSector edc:beginaddr="0x2006" edc:endaddr="0x2007" edc:mask="0x3fe0" edc:value="0xe20"/>
    <edc:ConfigFuseSector edc:beginaddr="0x2007" edc:endaddr="0x2008">
      <edc:DCRDef edc:_addr="0x2007" edc:cname="CONFIG" edc:desc="Configuration word" edc:default="0x3fff" edc:impl="0x2fcf" edc:nzwidth="14">
        <edc:DCRMode edc:id="DS.0">
          <edc:DCRFieldDef edc:cname="FOSC" edc:desc="Oscillator Selection bits" edc:mask="0x3" edc:nzwidth="2">
            <edc:DCRFieldSemantic edc:cname="LP" edc:desc="LP oscillator" edc:when="(field &amp; 0x3) == 0x0"/>
            <edc:DCRFieldSemantic edc:cname="XT" edc:desc="XT oscillator" edc:when="(field &amp; 0x3) == 0x1"/>
            <edc:DCRFieldSemantic edc:cname="HS" edc:desc="HS oscillator" edc:when="(field &amp; 0x3) == 0x2"/>
            <edc:DCRFieldSemantic edc:cname="RC" edc:desc="RC oscillator" edc:when="(field &amp; 0x3) == 0x3"/>
          </edc:DCRFieldDef>
          <edc:DCRFieldDef edc:cname="WDTE" edc:desc="Watchdog Timer Enable bit" edc:mask="0x1" edc:nzwidth="1">
            <edc:DCRFieldSemantic edc:cname="OFF" edc:desc="WDT disabled" edc:when="(field &amp; 0x1) == 0x0"/>
            <edc:DCRFieldSemantic edc:cname="ON" edc:desc="WDT enabled" edc:when="(field &amp; 0x1) == 0x1"/>
          </edc:DCRFieldDef>
          <edc:DCRFieldDef edc:cname="PWRTE" edc:desc="Power-up Timer Enable bit" edc:mask="0x1" edc:nzwidth="1"/>
          <edc:AdjustPoint edc:offset="2"/>
          <edc:DCRFieldDef edc:cname="BOREN" edc:desc="Brown-out Reset Enable bit" edc:mask="0x1" edc:nzwidth="1"/>
          <edc:DCRFieldDef edc:cname="LVP" edc:desc="Low-Voltage Programming Enable bit" edc:mask="0x1" edc:nzwidth="1"/>
          <edc:DCRFieldDef edc:cname="CPD" edc:desc="Data EEPROM Memory Code Protection bit" edc:mask="0x1" edc:nzwidth="1"/>
          <edc:DCRFieldDef edc:cname="WRT" edc:desc="Flash Program Memory Write Enable bits" edc:mask="0x3" edc:nzwidth="2">
            <edc:DCRFieldSemantic edc:cname="HALF" edc:desc="0000h to 0FFFh write-protected" edc:when="field == 0x0"/>
            <edc:DCRFieldSemantic edc:cname="OFF" edc:desc="Write protection off" edc:when="field == 0x3"/>
            <edc:DCRFieldSemantic edc:cname="ODD" edc:desc="Unparseable" edc:when="field in (1, 2)"/>
          </edc:DCRFieldDef>
          <edc:DCRFieldDef edc:cname="DEBUG" edc:desc="In-Circuit Debugger Mode bit" edc:mask="0x1" edc:nzwidth="1"/>
          <edc:AdjustPoint edc:offset="1"/>
          <edc:DCRFieldDef edc:cname="CP" edc:desc="Flash Program Memory Code Protection bit" edc:mask="0x1" edc:nzwidth="1"/>
        </edc:DCRMode>
        <edc:DCRMode edc:id="DS.1">
          <edc:DCRFieldDef edc:cname="IGNORED" edc:mask="0x3fff" edc:nzwidth="14"/>
        </edc:DCRMode>
      </edc:DCRDef>
    </edc:ConfigFuseSector>
    <edc:EEDataSector edc:beginaddr="0x2100" edc:endaddr="0x2200"/>
  </edc:ProgramSpace>
  <edc:DataSpace>
    <edc:RegardlessOfMode>
      <edc:GPRDataSector edc:regionid="gprnobnk" edc:beginaddr="0x70" edc:endaddr="0x80"/>
      <edc:GPRDataSector edc:regionid="gpr0" edc:beginaddr="0x20" edc:endaddr="0x70"/>
      <edc:GPRDataSector edc:regionid="gpr1" edc:beginaddr="0xa0" edc:endaddr="0xf0"/>
    </edc:RegardlessOfMode>
    <edc:ExtendedModeOnly>
      <edc:GPRDataSector edc:regionid="ext" edc:beginaddr="0x100" edc:endaddr="0x110"/>
    </edc:ExtendedModeOnly>
  </edc:DataSpace>
  <edc:PinList>
    <edc:Pin><edc:VirtualPin edc:name="MCLR"/><edc:VirtualPin edc:name="VPP"/></edc:Pin>
    <edc:Pin><edc:VirtualPin edc:name="RA0"/><edc:VirtualPin edc:name="AN0"/></edc:Pin>
    <edc:Pin><edc:VirtualPin edc:name="RA1"/><edc:VirtualPin edc:name="AN1"/></edc:Pin>
  </edc:PinList>
</edc:PIC>
"#;
